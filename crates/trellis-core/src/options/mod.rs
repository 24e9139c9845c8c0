//! # Component Options
//!
//! Configuration objects describing a component type and the strategies used
//! to combine them.
//!
//! - [`Layered`](layered::Layered) is the layered lookup every option object
//!   and asset registry is built on: local entries plus a shared fallback.
//! - [`OptionValue`] is the typed value stored under an option key. Values that
//!   carry behaviour or shared structure live behind `Rc`, so "did this field
//!   change" is an identity comparison ([`OptionValue::same_as`]).
//! - [`merge`] holds the per-field merge strategies.
pub mod hooks;
pub mod layered;
pub mod merge;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::constructor::ConstructorId;
use crate::instance::Instance;
use crate::instance::vnode::VNode;
use crate::kernel::constants::keys;
use crate::kernel::error::Result;

pub use hooks::{HookFn, HookList, LifecycleHook, empty_hooks};
pub use layered::Layered;
pub use merge::{Strategy, merge_options};

/// A component configuration object.
pub type Options = Layered<OptionValue>;

/// Named components, directives or filters visible to a configuration.
pub type AssetRegistry = Layered<Asset>;

/// Callable attached to an instance: methods, computed getters, watchers and
/// event listeners all share this shape.
pub type Callable = Rc<dyn Fn(&Instance, &[Value]) -> Result<Value>>;

/// Methods or computed getters keyed by name.
pub type FunctionMap = Rc<BTreeMap<String, Callable>>;

/// Watch handlers keyed by the watched state key.
pub type WatchMap = Rc<BTreeMap<String, Vec<Callable>>>;

/// Event listeners keyed by event name.
pub type ListenerMap = Rc<BTreeMap<String, Vec<Callable>>>;

/// Produces the virtual node tree of an instance.
pub type RenderFn = Rc<dyn Fn(&Instance) -> Result<VNode>>;

/// Wrap a closure as a [`Callable`].
pub fn callable<F>(f: F) -> Callable
where
    F: Fn(&Instance, &[Value]) -> Result<Value> + 'static,
{
    Rc::new(f)
}

/// Wrap a closure as a [`RenderFn`].
pub fn render_fn<F>(f: F) -> RenderFn
where
    F: Fn(&Instance) -> Result<VNode> + 'static,
{
    Rc::new(f)
}

/// Typed value stored under an option key.
#[derive(Clone)]
pub enum OptionValue {
    /// Plain data: names, mount targets, data/props/provide/inject objects.
    Value(Value),
    Hooks(HookList),
    Assets(Rc<AssetRegistry>),
    /// Methods or computed getters.
    Functions(FunctionMap),
    Watch(WatchMap),
    Mixins(Rc<[Rc<Options>]>),
    Extends(Rc<Options>),
    Render(RenderFn),
    StaticRenderFns(Rc<[RenderFn]>),
    Constructor(ConstructorId),
    Parent(Weak<Instance>),
    Vnode(Rc<VNode>),
    Listeners(ListenerMap),
    Children(Rc<[VNode]>),
}

impl OptionValue {
    /// Identity comparison used by the late-modification diff.
    ///
    /// Plain data compares by value; everything behind an `Rc` compares by
    /// pointer.
    pub fn same_as(&self, other: &OptionValue) -> bool {
        use OptionValue as V;
        match (self, other) {
            (V::Value(a), V::Value(b)) => a == b,
            (V::Hooks(a), V::Hooks(b)) => Rc::ptr_eq(a, b),
            (V::Assets(a), V::Assets(b)) => Rc::ptr_eq(a, b),
            (V::Functions(a), V::Functions(b)) => Rc::ptr_eq(a, b),
            (V::Watch(a), V::Watch(b)) => Rc::ptr_eq(a, b),
            (V::Mixins(a), V::Mixins(b)) => Rc::ptr_eq(a, b),
            (V::Extends(a), V::Extends(b)) => Rc::ptr_eq(a, b),
            (V::Render(a), V::Render(b)) => Rc::ptr_eq(a, b),
            (V::StaticRenderFns(a), V::StaticRenderFns(b)) => Rc::ptr_eq(a, b),
            (V::Constructor(a), V::Constructor(b)) => a == b,
            (V::Parent(a), V::Parent(b)) => Weak::ptr_eq(a, b),
            (V::Vnode(a), V::Vnode(b)) => Rc::ptr_eq(a, b),
            (V::Listeners(a), V::Listeners(b)) => Rc::ptr_eq(a, b),
            (V::Children(a), V::Children(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Short name of the variant, used in debug output.
    pub fn kind(&self) -> &'static str {
        match self {
            OptionValue::Value(_) => "value",
            OptionValue::Hooks(_) => "hooks",
            OptionValue::Assets(_) => "assets",
            OptionValue::Functions(_) => "functions",
            OptionValue::Watch(_) => "watch",
            OptionValue::Mixins(_) => "mixins",
            OptionValue::Extends(_) => "extends",
            OptionValue::Render(_) => "render",
            OptionValue::StaticRenderFns(_) => "static-render-fns",
            OptionValue::Constructor(_) => "constructor",
            OptionValue::Parent(_) => "parent",
            OptionValue::Vnode(_) => "vnode",
            OptionValue::Listeners(_) => "listeners",
            OptionValue::Children(_) => "children",
        }
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        OptionValue::Value(value)
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            OptionValue::Hooks(hooks) => f.debug_tuple("Hooks").field(hooks).finish(),
            OptionValue::Assets(assets) => f.debug_tuple("Assets").field(&assets.keys()).finish(),
            OptionValue::Functions(map) => {
                f.debug_tuple("Functions").field(&map.keys().collect::<Vec<_>>()).finish()
            }
            OptionValue::Watch(map) => f.debug_tuple("Watch").field(&map.keys().collect::<Vec<_>>()).finish(),
            OptionValue::Listeners(map) => {
                f.debug_tuple("Listeners").field(&map.keys().collect::<Vec<_>>()).finish()
            }
            OptionValue::Constructor(id) => f.debug_tuple("Constructor").field(id).finish(),
            other => write!(f, "{}(..)", other.kind()),
        }
    }
}

/// Entry in an [`AssetRegistry`].
#[derive(Clone, Debug)]
pub enum Asset {
    /// A declared constructor.
    Constructor(ConstructorId),
    /// A definition not yet turned into a constructor.
    Definition(Rc<Options>),
    /// Directive or filter payload.
    Value(Value),
}

impl Asset {
    pub fn constructor(&self) -> Option<ConstructorId> {
        match self {
            Asset::Constructor(id) => Some(*id),
            _ => None,
        }
    }
}

/// The three asset registries every configuration carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Component,
    Directive,
    Filter,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Component, AssetKind::Directive, AssetKind::Filter];

    /// Option key of the registry.
    pub fn key(&self) -> &'static str {
        match self {
            AssetKind::Component => keys::COMPONENTS,
            AssetKind::Directive => keys::DIRECTIVES,
            AssetKind::Filter => keys::FILTERS,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Component => f.write_str("component"),
            AssetKind::Directive => f.write_str("directive"),
            AssetKind::Filter => f.write_str("filter"),
        }
    }
}

// Typed accessors and builders for option objects.
impl Layered<OptionValue> {
    /// Plain data stored under `key`.
    pub fn value(&self, key: &str) -> Option<Value> {
        match self.get(key) {
            Some(OptionValue::Value(value)) => Some(value),
            _ => None,
        }
    }

    fn string(&self, key: &str) -> Option<String> {
        match self.value(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<String> {
        self.string(keys::NAME)
    }

    /// Mount target selector, if the configuration auto-mounts.
    pub fn el(&self) -> Option<String> {
        self.string(keys::EL)
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self.value(keys::ABSTRACT), Some(Value::Bool(true)))
    }

    /// Whether these options are the output of a merge.
    pub fn is_merged(&self) -> bool {
        self.get(keys::BASE).is_some()
    }

    pub fn base_constructor(&self) -> Option<ConstructorId> {
        match self.get(keys::BASE) {
            Some(OptionValue::Constructor(id)) => Some(id),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<Value> {
        self.value(keys::DATA)
    }

    pub fn props(&self) -> Option<Value> {
        self.value(keys::PROPS)
    }

    pub fn props_data(&self) -> Option<Value> {
        self.value(keys::PROPS_DATA)
    }

    pub fn provide(&self) -> Option<Value> {
        self.value(keys::PROVIDE)
    }

    pub fn inject(&self) -> Option<Value> {
        self.value(keys::INJECT)
    }

    /// Hooks registered for `hook`; empty when none are.
    pub fn hooks(&self, hook: LifecycleHook) -> HookList {
        match self.get(hook.as_str()) {
            Some(OptionValue::Hooks(list)) => list,
            _ => empty_hooks(),
        }
    }

    pub fn assets(&self, kind: AssetKind) -> Option<Rc<AssetRegistry>> {
        match self.get(kind.key()) {
            Some(OptionValue::Assets(registry)) => Some(registry),
            _ => None,
        }
    }

    pub fn components(&self) -> Option<Rc<AssetRegistry>> {
        self.assets(AssetKind::Component)
    }

    fn functions(&self, key: &str) -> Option<FunctionMap> {
        match self.get(key) {
            Some(OptionValue::Functions(map)) => Some(map),
            _ => None,
        }
    }

    pub fn methods(&self) -> Option<FunctionMap> {
        self.functions(keys::METHODS)
    }

    pub fn computed(&self) -> Option<FunctionMap> {
        self.functions(keys::COMPUTED)
    }

    pub fn watch(&self) -> Option<WatchMap> {
        match self.get(keys::WATCH) {
            Some(OptionValue::Watch(map)) => Some(map),
            _ => None,
        }
    }

    pub fn mixins(&self) -> Option<Rc<[Rc<Options>]>> {
        match self.get(keys::MIXINS) {
            Some(OptionValue::Mixins(list)) => Some(list),
            _ => None,
        }
    }

    pub fn extends(&self) -> Option<Rc<Options>> {
        match self.get(keys::EXTENDS) {
            Some(OptionValue::Extends(options)) => Some(options),
            _ => None,
        }
    }

    pub fn render(&self) -> Option<RenderFn> {
        match self.get(keys::RENDER) {
            Some(OptionValue::Render(render)) => Some(render),
            _ => None,
        }
    }

    pub fn static_render_fns(&self) -> Option<Rc<[RenderFn]>> {
        match self.get(keys::STATIC_RENDER_FNS) {
            Some(OptionValue::StaticRenderFns(fns)) => Some(fns),
            _ => None,
        }
    }

    /// Parent instance, if it is still alive.
    pub fn parent(&self) -> Option<Rc<Instance>> {
        match self.get(keys::PARENT) {
            Some(OptionValue::Parent(parent)) => parent.upgrade(),
            _ => None,
        }
    }

    pub fn parent_vnode(&self) -> Option<Rc<VNode>> {
        match self.get(keys::PARENT_VNODE) {
            Some(OptionValue::Vnode(vnode)) => Some(vnode),
            _ => None,
        }
    }

    pub fn parent_listeners(&self) -> Option<ListenerMap> {
        match self.get(keys::PARENT_LISTENERS) {
            Some(OptionValue::Listeners(listeners)) => Some(listeners),
            _ => None,
        }
    }

    pub fn render_children(&self) -> Option<Rc<[VNode]>> {
        match self.get(keys::RENDER_CHILDREN) {
            Some(OptionValue::Children(children)) => Some(children),
            _ => None,
        }
    }

    pub fn component_tag(&self) -> Option<String> {
        self.string(keys::COMPONENT_TAG)
    }

    /// Set plain data under `key`.
    pub fn with_value(self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, OptionValue::Value(value.into()));
        self
    }

    /// Append a hook for `hook` to the local hook list.
    pub fn with_hook(self, hook: LifecycleHook, callback: HookFn) -> Self {
        let mut list: Vec<HookFn> = match self.get_own(hook.as_str()) {
            Some(OptionValue::Hooks(existing)) => existing.to_vec(),
            _ => Vec::new(),
        };
        list.push(callback);
        self.set(hook.as_str(), OptionValue::Hooks(Rc::from(list)));
        self
    }

    /// Add an asset to the local registry of `kind`, creating it if needed.
    pub fn with_asset(self, kind: AssetKind, name: &str, asset: Asset) -> Self {
        let registry = match self.get_own(kind.key()) {
            Some(OptionValue::Assets(registry)) => registry,
            _ => {
                let registry = Rc::new(AssetRegistry::new());
                self.set(kind.key(), OptionValue::Assets(registry.clone()));
                registry
            }
        };
        registry.set(name, asset);
        self
    }

    /// Register a child component definition under `name`.
    pub fn with_component(self, name: &str, definition: Rc<Options>) -> Self {
        self.with_asset(AssetKind::Component, name, Asset::Definition(definition))
    }

    fn with_function(self, key: &str, name: &str, f: Callable) -> Self {
        let mut map = match self.get_own(key) {
            Some(OptionValue::Functions(existing)) => (*existing).clone(),
            _ => BTreeMap::new(),
        };
        map.insert(name.to_string(), f);
        self.set(key, OptionValue::Functions(Rc::new(map)));
        self
    }

    pub fn with_method(self, name: &str, f: Callable) -> Self {
        self.with_function(keys::METHODS, name, f)
    }

    pub fn with_computed(self, name: &str, f: Callable) -> Self {
        self.with_function(keys::COMPUTED, name, f)
    }

    /// Add a watch handler for `key`.
    pub fn with_watch(self, key: &str, handler: Callable) -> Self {
        let mut map = match self.get_own(keys::WATCH) {
            Some(OptionValue::Watch(existing)) => (*existing).clone(),
            _ => BTreeMap::new(),
        };
        map.entry(key.to_string()).or_default().push(handler);
        self.set(keys::WATCH, OptionValue::Watch(Rc::new(map)));
        self
    }

    pub fn with_mixin(self, mixin: Rc<Options>) -> Self {
        let mut list: Vec<Rc<Options>> = self.mixins().map(|m| m.to_vec()).unwrap_or_default();
        list.push(mixin);
        self.set(keys::MIXINS, OptionValue::Mixins(Rc::from(list)));
        self
    }

    pub fn with_extends(self, base: Rc<Options>) -> Self {
        self.set(keys::EXTENDS, OptionValue::Extends(base));
        self
    }

    pub fn with_render(self, render: RenderFn) -> Self {
        self.set(keys::RENDER, OptionValue::Render(render));
        self
    }

    /// Wrap into the shared handle the rest of the runtime works with.
    pub fn shared(self) -> Rc<Options> {
        Rc::new(self)
    }
}
