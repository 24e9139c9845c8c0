use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::constructor::{ConstructorId, OptionStore};
use crate::instance::init::initialize;
use crate::instance::{DefaultSubsystems, Instance, InstanceConfig, InternalDescriptor, Subsystems, VNode};
use crate::kernel::config::RuntimeConfig;
use crate::kernel::constants::{self, keys};
use crate::kernel::diagnostics;
use crate::kernel::error::{Error, Result};
use crate::options::{Asset, AssetKind, OptionValue, Options, merge_options};

/// Owns the constructor registry, the instance id counter and the
/// initialization collaborators.
pub struct Runtime {
    config: RuntimeConfig,
    store: OptionStore,
    subsystems: Box<dyn Subsystems>,
    next_uid: Cell<u64>,
}

impl Runtime {
    /// Creates a runtime with the default collaborators.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_subsystems(config, Box::new(DefaultSubsystems))
    }

    pub fn with_subsystems(config: RuntimeConfig, subsystems: Box<dyn Subsystems>) -> Self {
        log::debug!(
            "Starting {} v{} (diagnostics: {}, performance: {})",
            constants::APP_NAME,
            constants::APP_VERSION,
            config.diagnostics,
            config.performance
        );
        Self {
            config,
            store: OptionStore::new(),
            subsystems,
            next_uid: Cell::new(0),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn store(&self) -> &OptionStore {
        &self.store
    }

    pub fn subsystems(&self) -> &dyn Subsystems {
        self.subsystems.as_ref()
    }

    /// The root constructor every other constructor descends from.
    pub fn base(&self) -> ConstructorId {
        self.store.base()
    }

    /// Number of instances created so far.
    pub fn instances_created(&self) -> u64 {
        self.next_uid.get()
    }

    pub(crate) fn next_uid(&self) -> u64 {
        let uid = self.next_uid.get();
        self.next_uid.set(uid + 1);
        uid
    }

    /// Report a usage problem through the configured diagnostics channel.
    pub fn warn(&self, message: &str) {
        diagnostics::warn(&self.config, message);
    }

    /// Declare a constructor extending `parent` with `definition`.
    pub fn extend(&self, parent: ConstructorId, definition: Rc<Options>) -> Result<ConstructorId> {
        if self.config.diagnostics {
            if let Some(name) = definition.name() {
                diagnostics::validate_component_name(&self.config, &name);
            }
        }
        self.store.extend(parent, definition)
    }

    /// Merge `mixin` into the options of `ctor`.
    ///
    /// Descendants pick the change up on their next resolution.
    pub fn mixin(&self, ctor: ConstructorId, mixin: Rc<Options>) -> Result<()> {
        let current = self.store.resolve(ctor)?;
        let merged = merge_options(&current, &mixin, None);
        log::debug!("Applied mixin to {}", ctor);
        self.store.replace_options(ctor, merged)
    }

    /// Register an asset on `ctor`.
    ///
    /// A component given as a plain definition is turned into a constructor
    /// extending the base first, named after the registration if it has no
    /// name of its own.
    pub fn register(&self, ctor: ConstructorId, kind: AssetKind, name: &str, asset: Asset) -> Result<Asset> {
        let asset = match (kind, asset) {
            (AssetKind::Component, Asset::Definition(definition)) => {
                if self.config.diagnostics {
                    diagnostics::validate_component_name(&self.config, name);
                }
                if definition.name().is_none() {
                    definition.set(keys::NAME, OptionValue::Value(Value::String(name.to_string())));
                }
                Asset::Constructor(self.extend(self.base(), definition)?)
            }
            (_, asset) => asset,
        };
        self.store.register_asset(ctor, kind, name, asset.clone())?;
        log::debug!("Registered {} '{}' on {}", kind, name, ctor);
        Ok(asset)
    }

    /// Register a global component and return its constructor.
    pub fn component(&self, name: &str, definition: Rc<Options>) -> Result<ConstructorId> {
        match self.register(self.base(), AssetKind::Component, name, Asset::Definition(definition))? {
            Asset::Constructor(id) => Ok(id),
            other => Err(Error::Other(format!("component '{}' registered as {:?}", name, other))),
        }
    }

    pub fn directive(&self, name: &str, definition: Value) -> Result<()> {
        self.register(self.base(), AssetKind::Directive, name, Asset::Value(definition))
            .map(|_| ())
    }

    pub fn filter(&self, name: &str, definition: Value) -> Result<()> {
        self.register(self.base(), AssetKind::Filter, name, Asset::Value(definition))
            .map(|_| ())
    }

    /// Constructor for the component `name` as seen from `vm`'s registry.
    ///
    /// Plain definitions are extended from the base; repeated lookups reuse
    /// the same constructor.
    pub fn component_constructor(&self, vm: &Instance, name: &str) -> Result<Option<ConstructorId>> {
        let Some(registry) = vm.options().components() else {
            return Ok(None);
        };
        match registry.get(name) {
            Some(Asset::Constructor(id)) => Ok(Some(id)),
            Some(Asset::Definition(definition)) => self.extend(self.base(), definition).map(Some),
            Some(Asset::Value(_)) | None => Ok(None),
        }
    }

    /// Create and initialize an instance of `ctor`.
    pub fn new_instance(&self, ctor: ConstructorId, config: impl Into<InstanceConfig>) -> Result<Rc<Instance>> {
        initialize(self, ctor, config.into())
    }

    /// Invoke `ctor` as a plain function.
    ///
    /// Warns that constructors are meant to go through
    /// [`new_instance`](Self::new_instance), then initializes normally.
    pub fn call_constructor(&self, ctor: ConstructorId, config: impl Into<InstanceConfig>) -> Result<Rc<Instance>> {
        self.warn("Trellis is a constructor and should be called through `new_instance`");
        initialize(self, ctor, config.into())
    }

    /// Create the child instance for a component placeholder rendered by
    /// `parent`.
    pub fn create_component_instance(&self, parent: &Rc<Instance>, vnode: Rc<VNode>) -> Result<Rc<Instance>> {
        let Some(ctor) = vnode.component.as_ref().map(|component| component.ctor) else {
            return Err(Error::Other(format!(
                "vnode <{}> is not a component placeholder",
                vnode.tag.as_deref().unwrap_or("?")
            )));
        };
        let descriptor = InternalDescriptor::new(parent.clone(), vnode);
        self.new_instance(ctor, InstanceConfig::Internal(descriptor))
    }

    /// Create, mount and link child instances for every component placeholder
    /// in `vm`'s rendered tree, recursively. Returns the direct children.
    ///
    /// Children are mounted at their parent's mount target. Nothing happens
    /// for an instance that has not rendered.
    pub fn instantiate_children(&self, vm: &Rc<Instance>) -> Result<Vec<Rc<Instance>>> {
        let Some(tree) = vm.vnode() else {
            return Ok(Vec::new());
        };
        let target = vm.mount_target().unwrap_or_default();
        let mut placeholders = Vec::new();
        collect_placeholders(&tree, &mut placeholders);

        let mut created = Vec::with_capacity(placeholders.len());
        for placeholder in placeholders {
            let child = self.create_component_instance(vm, Rc::new(placeholder))?;
            self.mount(&child, &target)?;
            self.instantiate_children(&child)?;
            created.push(child);
        }
        Ok(created)
    }

    /// Mount an instance that was created without a mount target.
    pub fn mount(&self, vm: &Rc<Instance>, target: &str) -> Result<()> {
        self.subsystems.mount(vm, target)
    }
}

/// Component placeholders in `node`, not descending into their slot content.
fn collect_placeholders(node: &VNode, out: &mut Vec<VNode>) {
    if node.component.is_some() {
        out.push(node.clone());
        return;
    }
    for child in &node.children {
        collect_placeholders(child, out);
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("constructors", &self.store.len())
            .field("instances_created", &self.next_uid.get())
            .finish()
    }
}
