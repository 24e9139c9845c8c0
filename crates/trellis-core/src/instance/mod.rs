//! # Component Instances
//!
//! A live component: its merged options plus the per-instance state the
//! initialization collaborators attach to it.
//!
//! - [`init`] runs the fixed initialization sequence.
//! - [`internal`] builds options for child instances created during a parent
//!   render without a full merge.
//! - [`subsystems`] defines the collaborator seam; [`defaults`] holds the
//!   collaborators used when none are supplied.
pub mod defaults;
pub mod init;
pub mod internal;
pub mod subsystems;
pub mod vnode;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};

use crate::constructor::ConstructorId;
use crate::kernel::constants::{ANONYMOUS_DISPLAY_NAME, ROOT_DISPLAY_NAME};
use crate::kernel::error::{Error, Result};
use crate::options::{Callable, Options};

pub use init::{InitStep, InstanceConfig};
pub use internal::{InternalDescriptor, build_internal};
pub use subsystems::{DefaultSubsystems, Subsystems};
pub use vnode::{ComponentVNodeOptions, VNode};

/// How property reads made during render are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderProxy {
    /// Not yet decided; initialization has not reached the proxy step.
    Unset,
    /// Reads go straight to the instance.
    Passthrough,
    /// Reads of undeclared keys emit a warning.
    Guarded,
}

pub struct Instance {
    uid: u64,
    constructor: ConstructorId,
    observation_exempt: bool,
    options: RefCell<Rc<Options>>,
    render_proxy: Cell<RenderProxy>,
    self_ref: RefCell<Weak<Instance>>,
    parent: RefCell<Weak<Instance>>,
    root: RefCell<Weak<Instance>>,
    children: RefCell<Vec<Rc<Instance>>>,
    is_mounted: Cell<bool>,
    mount_target: RefCell<Option<String>>,
    events: RefCell<BTreeMap<String, Vec<Callable>>>,
    has_hook_event: Cell<bool>,
    slots: RefCell<BTreeMap<String, Vec<VNode>>>,
    vnode: RefCell<Option<VNode>>,
    state: RefCell<Map<String, Value>>,
    watchers: RefCell<BTreeMap<String, Vec<Callable>>>,
    provided: RefCell<Map<String, Value>>,
}

impl Instance {
    /// A fresh, unconfigured instance. It is exempt from observation from
    /// the moment it exists.
    pub(crate) fn new(uid: u64, constructor: ConstructorId) -> Self {
        Self {
            uid,
            constructor,
            observation_exempt: true,
            options: RefCell::new(Rc::new(Options::new())),
            render_proxy: Cell::new(RenderProxy::Unset),
            self_ref: RefCell::new(Weak::new()),
            parent: RefCell::new(Weak::new()),
            root: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            is_mounted: Cell::new(false),
            mount_target: RefCell::new(None),
            events: RefCell::new(BTreeMap::new()),
            has_hook_event: Cell::new(false),
            slots: RefCell::new(BTreeMap::new()),
            vnode: RefCell::new(None),
            state: RefCell::new(Map::new()),
            watchers: RefCell::new(BTreeMap::new()),
            provided: RefCell::new(Map::new()),
        }
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn constructor(&self) -> ConstructorId {
        self.constructor
    }

    /// Instances are never made reactive themselves.
    pub fn is_observation_exempt(&self) -> bool {
        self.observation_exempt
    }

    pub fn options(&self) -> Rc<Options> {
        self.options.borrow().clone()
    }

    pub(crate) fn set_options(&self, options: Rc<Options>) {
        *self.options.borrow_mut() = options;
    }

    pub fn render_proxy(&self) -> RenderProxy {
        self.render_proxy.get()
    }

    pub fn set_render_proxy(&self, proxy: RenderProxy) {
        self.render_proxy.set(proxy);
    }

    /// Self-reference exposed once initialization passes the proxy step.
    pub fn self_ref(&self) -> Option<Rc<Instance>> {
        self.self_ref.borrow().upgrade()
    }

    pub(crate) fn expose_self(self: &Rc<Self>) {
        *self.self_ref.borrow_mut() = Rc::downgrade(self);
    }

    // ---- tree ----

    pub fn parent(&self) -> Option<Rc<Instance>> {
        self.parent.borrow().upgrade()
    }

    pub fn set_parent(&self, parent: Option<&Rc<Instance>>) {
        *self.parent.borrow_mut() = parent.map(Rc::downgrade).unwrap_or_default();
    }

    pub fn root(&self) -> Option<Rc<Instance>> {
        self.root.borrow().upgrade()
    }

    pub fn set_root(&self, root: &Rc<Instance>) {
        *self.root.borrow_mut() = Rc::downgrade(root);
    }

    pub fn children(&self) -> Vec<Rc<Instance>> {
        self.children.borrow().clone()
    }

    pub fn add_child(&self, child: Rc<Instance>) {
        self.children.borrow_mut().push(child);
    }

    /// Whether this instance was created without a parent.
    pub fn is_root(&self) -> bool {
        self.options().parent().is_none()
    }

    pub fn is_mounted(&self) -> bool {
        self.is_mounted.get()
    }

    pub fn set_mounted(&self, mounted: bool) {
        self.is_mounted.set(mounted);
    }

    pub fn mount_target(&self) -> Option<String> {
        self.mount_target.borrow().clone()
    }

    pub fn set_mount_target(&self, target: Option<&str>) {
        *self.mount_target.borrow_mut() = target.map(str::to_string);
    }

    // ---- events ----

    /// Register `handler` for `event`.
    pub fn on(&self, event: &str, handler: Callable) {
        if event.starts_with("hook:") {
            self.has_hook_event.set(true);
        }
        self.events.borrow_mut().entry(event.to_string()).or_default().push(handler);
    }

    /// Remove every handler for `event`.
    pub fn off(&self, event: &str) {
        self.events.borrow_mut().remove(event);
    }

    /// Invoke the handlers registered for `event` in registration order.
    pub fn emit(&self, event: &str, args: &[Value]) -> Result<()> {
        let handlers = self.events.borrow().get(event).cloned().unwrap_or_default();
        for handler in handlers {
            handler(self, args)?;
        }
        Ok(())
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.events.borrow().get(event).map_or(0, Vec::len)
    }

    /// Whether any `hook:*` listener has been registered.
    pub fn has_hook_event(&self) -> bool {
        self.has_hook_event.get()
    }

    // ---- render ----

    pub fn slots(&self) -> BTreeMap<String, Vec<VNode>> {
        self.slots.borrow().clone()
    }

    pub fn slot(&self, name: &str) -> Option<Vec<VNode>> {
        self.slots.borrow().get(name).cloned()
    }

    pub fn set_slots(&self, slots: BTreeMap<String, Vec<VNode>>) {
        *self.slots.borrow_mut() = slots;
    }

    /// The tree produced by the last render.
    pub fn vnode(&self) -> Option<VNode> {
        self.vnode.borrow().clone()
    }

    pub fn set_vnode(&self, vnode: Option<VNode>) {
        *self.vnode.borrow_mut() = vnode;
    }

    // ---- state ----

    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.borrow().get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.state.borrow().contains_key(key)
    }

    pub fn state_keys(&self) -> Vec<String> {
        self.state.borrow().keys().cloned().collect()
    }

    /// Snapshot of the instance state as a JSON object.
    pub fn state(&self) -> Value {
        Value::Object(self.state.borrow().clone())
    }

    /// Define `key` without notifying watchers.
    pub fn define(&self, key: &str, value: Value) {
        self.state.borrow_mut().insert(key.to_string(), value);
    }

    /// Update `key`, then run its watchers with `[new, old]` if the value
    /// changed.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let old = self.state.borrow_mut().insert(key.to_string(), value.clone());
        if old.as_ref() == Some(&value) {
            return Ok(());
        }
        let handlers = self.watchers.borrow().get(key).cloned().unwrap_or_default();
        let args = [value, old.unwrap_or(Value::Null)];
        for handler in handlers {
            handler(self, &args[..])?;
        }
        Ok(())
    }

    pub fn watch(&self, key: &str, handler: Callable) {
        self.watchers.borrow_mut().entry(key.to_string()).or_default().push(handler);
    }

    pub fn watcher_count(&self, key: &str) -> usize {
        self.watchers.borrow().get(key).map_or(0, Vec::len)
    }

    pub fn provided(&self, key: &str) -> Option<Value> {
        self.provided.borrow().get(key).cloned()
    }

    pub fn set_provided(&self, provided: Map<String, Value>) {
        *self.provided.borrow_mut() = provided;
    }

    pub fn call_method(&self, name: &str, args: &[Value]) -> Result<Value> {
        let method = self.options().methods().and_then(|methods| methods.get(name).cloned());
        match method {
            Some(method) => method(self, args),
            None => Err(Error::MethodNotFound {
                name: name.to_string(),
                component: self.display_name(),
            }),
        }
    }

    /// Evaluate the computed getter `name`.
    pub fn computed(&self, name: &str) -> Result<Value> {
        let getter = self.options().computed().and_then(|computed| computed.get(name).cloned());
        match getter {
            Some(getter) => getter(self, &[]),
            None => Err(Error::MethodNotFound {
                name: name.to_string(),
                component: self.display_name(),
            }),
        }
    }

    /// Property read as seen by a render function.
    ///
    /// Looks in state, then computed getters. Under a guarded proxy an
    /// unknown key is reported.
    pub fn proxy_get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }
        let declared = self.options().computed().is_some_and(|computed| computed.contains_key(key));
        if declared {
            return self.computed(key).ok();
        }
        if self.render_proxy() == RenderProxy::Guarded && !key.starts_with('_') && !key.starts_with('$') {
            log::warn!(
                "Property or method \"{}\" is not defined on {} but referenced during render",
                key,
                self.display_name()
            );
        }
        None
    }

    /// Human readable name used in logs: `<Root>`, `<Name>` or `<Anonymous>`.
    pub fn display_name(&self) -> String {
        if self.is_root() {
            return ROOT_DISPLAY_NAME.to_string();
        }
        let options = self.options();
        match options.name().or_else(|| options.component_tag()) {
            Some(name) => format!("<{}>", classify(&name)),
            None => ANONYMOUS_DISPLAY_NAME.to_string(),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("uid", &self.uid)
            .field("constructor", &self.constructor)
            .field("name", &self.options.borrow().name())
            .field("is_mounted", &self.is_mounted.get())
            .field("children", &self.children.borrow().len())
            .finish()
    }
}

/// `my-button` and `my_button` become `MyButton`.
fn classify(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
