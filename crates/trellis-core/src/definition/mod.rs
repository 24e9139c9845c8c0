//! # Component Definitions
//!
//! Serializable component definitions loaded from JSON, YAML or TOML files
//! and converted into option objects.
//!
//! Callbacks cannot be written in a data file, so hooks, methods and watchers
//! are given as labels and bound through a [`HookBinder`].
pub mod binder;
pub mod error;
pub mod format;

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use crate::kernel::constants::keys;
use crate::options::{
    Asset, AssetKind, AssetRegistry, Callable, HookFn, HookList, LifecycleHook, OptionValue, Options,
};

pub use binder::{HookBinder, LoggingBinder};
pub use error::DefinitionError;
pub use format::{DefinitionFormat, load_definition};

/// A component definition as written in a definition file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub name: Option<String>,
    pub el: Option<String>,
    pub template: Option<String>,
    pub data: Option<Value>,
    pub props: Option<Value>,
    pub provide: Option<Value>,
    pub inject: Option<Value>,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    /// Lifecycle stage name to hook labels.
    pub hooks: BTreeMap<String, Vec<String>>,
    /// Watched key to handler labels.
    pub watch: BTreeMap<String, Vec<String>>,
    pub methods: Vec<String>,
    pub components: BTreeMap<String, ComponentDefinition>,
    pub directives: BTreeMap<String, Value>,
    pub filters: BTreeMap<String, Value>,
    pub mixins: Vec<ComponentDefinition>,
    pub extends: Option<Box<ComponentDefinition>>,
    /// Any other key, stored as plain data.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ComponentDefinition {
    /// Build an option object, binding callbacks through `binder`.
    pub fn to_options(&self, binder: &dyn HookBinder) -> Result<Rc<Options>, DefinitionError> {
        let options = Options::new();

        let plain = [
            (keys::NAME, self.name.clone().map(Value::String)),
            (keys::EL, self.el.clone().map(Value::String)),
            (keys::TEMPLATE, self.template.clone().map(Value::String)),
            (keys::DATA, self.data.clone()),
            (keys::PROPS, self.props.clone()),
            (keys::PROVIDE, self.provide.clone()),
            (keys::INJECT, self.inject.clone()),
        ];
        for (key, value) in plain {
            if let Some(value) = value {
                options.set(key, OptionValue::Value(value));
            }
        }
        if self.is_abstract {
            options.set(keys::ABSTRACT, OptionValue::Value(Value::Bool(true)));
        }
        for (key, value) in &self.extra {
            options.set(key.as_str(), OptionValue::Value(value.clone()));
        }

        for (stage, labels) in &self.hooks {
            let hook = LifecycleHook::from_key(stage).ok_or_else(|| DefinitionError::UnknownHook {
                name: stage.clone(),
            })?;
            let list: Vec<HookFn> = labels.iter().map(|label| binder.hook(hook, label)).collect();
            options.set(hook.as_str(), OptionValue::Hooks(HookList::from(list)));
        }

        if !self.methods.is_empty() {
            let methods = self
                .methods
                .iter()
                .map(|name| (name.clone(), binder.method(name)))
                .collect::<BTreeMap<_, _>>();
            options.set(keys::METHODS, OptionValue::Functions(Rc::new(methods)));
        }

        if !self.watch.is_empty() {
            let watch = self
                .watch
                .iter()
                .map(|(key, labels)| {
                    let handlers = labels.iter().map(|label| binder.watcher(key, label)).collect::<Vec<Callable>>();
                    (key.clone(), handlers)
                })
                .collect::<BTreeMap<_, _>>();
            options.set(keys::WATCH, OptionValue::Watch(Rc::new(watch)));
        }

        if let Some(render) = self.template.as_deref().and_then(|template| binder.render(template)) {
            options.set(keys::RENDER, OptionValue::Render(render));
        }

        if !self.components.is_empty() {
            let registry = AssetRegistry::new();
            for (name, child) in &self.components {
                registry.set(name.as_str(), Asset::Definition(child.to_options(binder)?));
            }
            options.set(AssetKind::Component.key(), OptionValue::Assets(Rc::new(registry)));
        }
        for (kind, entries) in [(AssetKind::Directive, &self.directives), (AssetKind::Filter, &self.filters)] {
            if entries.is_empty() {
                continue;
            }
            let registry = AssetRegistry::new();
            for (name, value) in entries {
                registry.set(name.as_str(), Asset::Value(value.clone()));
            }
            options.set(kind.key(), OptionValue::Assets(Rc::new(registry)));
        }

        if !self.mixins.is_empty() {
            let mixins = self
                .mixins
                .iter()
                .map(|mixin| mixin.to_options(binder))
                .collect::<Result<Vec<_>, _>>()?;
            options.set(keys::MIXINS, OptionValue::Mixins(Rc::from(mixins)));
        }
        if let Some(base) = &self.extends {
            options.set(keys::EXTENDS, OptionValue::Extends(base.to_options(binder)?));
        }

        Ok(Rc::new(options))
    }
}

#[cfg(test)]
mod tests;
