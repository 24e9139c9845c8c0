//! Default initialization collaborators.
//!
//! State is plain JSON held on the instance; watchers run synchronously from
//! [`Instance::set`]. Nothing here is reactive.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use crate::instance::{Instance, VNode};
use crate::kernel::constants::{DEFAULT_SLOT, keys};
use crate::kernel::error::{Error, Result};
use crate::options::LifecycleHook;
use crate::options::merge::normalize;

/// Link `vm` into the instance tree.
///
/// The effective parent is the nearest non-abstract ancestor, unless `vm` is
/// itself abstract.
pub fn init_lifecycle(vm: &Rc<Instance>) -> Result<()> {
    let options = vm.options();
    let mut parent = options.parent();
    if !options.is_abstract() {
        while let Some(candidate) = parent.take() {
            if candidate.options().is_abstract() {
                parent = candidate.parent();
            } else {
                parent = Some(candidate);
                break;
            }
        }
    }

    if let Some(parent) = &parent {
        parent.add_child(vm.clone());
    }
    vm.set_parent(parent.as_ref());
    let root = parent.as_ref().and_then(|p| p.root()).unwrap_or_else(|| vm.clone());
    vm.set_root(&root);
    vm.set_mounted(false);
    Ok(())
}

/// Attach the listeners the parent declared on the component placeholder.
pub fn init_events(vm: &Rc<Instance>) -> Result<()> {
    if let Some(listeners) = vm.options().parent_listeners() {
        for (event, handlers) in listeners.iter() {
            for handler in handlers {
                vm.on(event, handler.clone());
            }
        }
    }
    Ok(())
}

/// Distribute the placeholder's children into named slots.
pub fn init_render(vm: &Rc<Instance>) -> Result<()> {
    vm.set_vnode(None);
    let mut slots: BTreeMap<String, Vec<VNode>> = BTreeMap::new();
    if let Some(children) = vm.options().render_children() {
        for child in children.iter() {
            let name = child.slot.clone().unwrap_or_else(|| DEFAULT_SLOT.to_string());
            slots.entry(name).or_default().push(child.clone());
        }
    }
    // a default slot holding only whitespace is dropped
    if slots.get(DEFAULT_SLOT).is_some_and(|nodes| nodes.iter().all(VNode::is_whitespace)) {
        slots.remove(DEFAULT_SLOT);
    }
    vm.set_slots(slots);
    Ok(())
}

/// Run the `hook` callbacks in order, then emit `hook:<name>` if anything
/// listens for hook events.
pub fn call_hook(vm: &Rc<Instance>, hook: LifecycleHook) -> Result<()> {
    let hooks = vm.options().hooks(hook);
    for callback in hooks.iter() {
        log::trace!("{} {} -> {}", vm.display_name(), hook, callback.label());
        callback.call(vm)?;
    }
    if vm.has_hook_event() {
        vm.emit(&hook.event_name(), &[])?;
    }
    Ok(())
}

/// Resolve declared injections against the values provided by ancestors.
pub fn init_injections(vm: &Rc<Instance>) -> Result<()> {
    let Some(Value::Object(inject)) = vm.options().inject().map(|value| normalize(keys::INJECT, value)) else {
        return Ok(());
    };
    for (key, spec) in inject {
        let from = spec.get("from").and_then(Value::as_str).unwrap_or(key.as_str()).to_string();
        let mut source = vm.parent();
        let mut found = None;
        while let Some(ancestor) = source {
            if let Some(value) = ancestor.provided(&from) {
                found = Some(value);
                break;
            }
            source = ancestor.parent();
        }
        match found.or_else(|| spec.get("default").cloned()) {
            Some(value) => vm.define(&key, value),
            None => log::warn!("Injection \"{}\" not found in {}", key, vm.display_name()),
        }
    }
    Ok(())
}

/// Set up props, data and watchers.
pub fn init_state(vm: &Rc<Instance>) -> Result<()> {
    let options = vm.options();
    let mut prop_keys = Vec::new();

    if let Some(Value::Object(props)) = options.props().map(|value| normalize(keys::PROPS, value)) {
        let props_data = options.props_data();
        for (key, declaration) in props {
            let value = props_data
                .as_ref()
                .and_then(|data| data.get(&key))
                .cloned()
                .or_else(|| declaration.get("default").cloned())
                .unwrap_or(Value::Null);
            vm.define(&key, value);
            prop_keys.push(key);
        }
    }

    let methods = options.methods();
    match options.data() {
        Some(Value::Object(data)) => {
            for (key, value) in data {
                if prop_keys.contains(&key) {
                    log::warn!(
                        "The data property \"{}\" of {} is already declared as a prop",
                        key,
                        vm.display_name()
                    );
                    continue;
                }
                if methods.as_ref().is_some_and(|m| m.contains_key(&key)) {
                    log::warn!("Method \"{}\" of {} is shadowed by a data property", key, vm.display_name());
                }
                vm.define(&key, value);
            }
        }
        Some(other) => log::warn!("data of {} should be an object, got {}", vm.display_name(), other),
        None => {}
    }

    if let Some(watch) = options.watch() {
        for (key, handlers) in watch.iter() {
            for handler in handlers {
                vm.watch(key, handler.clone());
            }
        }
    }
    Ok(())
}

/// Publish the values this instance provides to its descendants.
pub fn init_provide(vm: &Rc<Instance>) -> Result<()> {
    match vm.options().provide() {
        Some(Value::Object(provided)) => vm.set_provided(provided),
        Some(other) => log::warn!("provide of {} should be an object, got {}", vm.display_name(), other),
        None => {}
    }
    Ok(())
}

/// Run the render function and keep its output.
pub fn render(vm: &Rc<Instance>) -> Result<()> {
    match vm.options().render() {
        Some(render) => {
            let tree = render(vm.as_ref()).map_err(|e| Error::RenderFailed {
                component: vm.display_name(),
                message: e.to_string(),
            })?;
            vm.set_vnode(Some(tree));
        }
        None => log::warn!("Failed to mount {}: render function not defined", vm.display_name()),
    }
    Ok(())
}
