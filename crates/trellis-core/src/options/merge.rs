//! Option merging.
//!
//! [`merge_options`] combines a parent configuration with a child
//! configuration into a fresh object. Each key is merged by the [`Strategy`]
//! selected for it; unknown keys use [`Strategy::Default`] (child wins when
//! present). Neither input is mutated.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::instance::Instance;
use crate::kernel::constants::keys;
use crate::options::{AssetRegistry, HookFn, HookList, LifecycleHook, OptionValue, Options};

/// Per-field merge behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Parent hooks then child hooks, each callback at most once.
    Hooks,
    /// New registry layer over the parent's registry, child entries copied in.
    Assets,
    /// Recursive object merge, child wins.
    Data,
    /// Key-wise union, child wins.
    Keyed,
    /// Key-wise union; handlers for the same key are concatenated when merging
    /// against a live instance, replaced otherwise.
    Watch,
    /// Child value if present, else parent value.
    Default,
}

impl Strategy {
    pub fn for_key(key: &str) -> Self {
        if LifecycleHook::from_key(key).is_some() {
            return Strategy::Hooks;
        }
        match key {
            keys::COMPONENTS | keys::DIRECTIVES | keys::FILTERS => Strategy::Assets,
            keys::DATA | keys::PROVIDE => Strategy::Data,
            keys::PROPS | keys::METHODS | keys::INJECT | keys::COMPUTED => Strategy::Keyed,
            keys::WATCH => Strategy::Watch,
            _ => Strategy::Default,
        }
    }
}

/// Merge `child` onto `parent`.
///
/// `vm` is supplied for runtime merges (instance creation) and omitted for
/// constructor-chain merges. A child that is not itself a merge result has its
/// `extends` and then its `mixins` folded into the parent first.
pub fn merge_options(parent: &Options, child: &Options, vm: Option<&Instance>) -> Rc<Options> {
    let mut folded: Option<Rc<Options>> = None;
    if !child.is_merged() {
        if let Some(base) = child.extends() {
            folded = Some(merge_options(folded.as_deref().unwrap_or(parent), &base, vm));
        }
        if let Some(mixins) = child.mixins() {
            for mixin in mixins.iter() {
                folded = Some(merge_options(folded.as_deref().unwrap_or(parent), mixin, vm));
            }
        }
    }
    let parent = folded.as_deref().unwrap_or(parent);

    let merged = Options::new();
    for key in parent.keys() {
        merge_field(&merged, &key, parent, child, vm);
    }
    for key in child.keys() {
        if !parent.has(&key) {
            merge_field(&merged, &key, parent, child, vm);
        }
    }
    Rc::new(merged)
}

fn merge_field(merged: &Options, key: &str, parent: &Options, child: &Options, vm: Option<&Instance>) {
    let parent_value = parent.get(key);
    let child_value = child.get(key);
    let value = match Strategy::for_key(key) {
        Strategy::Hooks => merge_hooks(parent_value, child_value),
        Strategy::Assets => merge_assets(parent_value, child_value),
        Strategy::Data => merge_data_field(parent_value, child_value),
        Strategy::Keyed => merge_keyed(key, parent_value, child_value),
        Strategy::Watch => merge_watch(parent_value, child_value, vm.is_some()),
        Strategy::Default => child_value.or(parent_value),
    };
    if let Some(value) = value {
        merged.set(key, value);
    }
}

fn merge_hooks(parent: Option<OptionValue>, child: Option<OptionValue>) -> Option<OptionValue> {
    match (parent, child) {
        (Some(OptionValue::Hooks(parent)), Some(OptionValue::Hooks(child))) => {
            let mut list: Vec<HookFn> = Vec::with_capacity(parent.len() + child.len());
            for hook in parent.iter().chain(child.iter()) {
                // the same callback reached through two paths runs once
                if !list.iter().any(|existing| existing.ptr_eq(hook)) {
                    list.push(hook.clone());
                }
            }
            Some(OptionValue::Hooks(HookList::from(list)))
        }
        (parent, None) => parent,
        (_, child) => child,
    }
}

fn merge_assets(parent: Option<OptionValue>, child: Option<OptionValue>) -> Option<OptionValue> {
    let layer = match parent {
        Some(OptionValue::Assets(parent)) => AssetRegistry::with_fallback(parent),
        _ => AssetRegistry::new(),
    };
    if let Some(OptionValue::Assets(child)) = child {
        for name in child.keys() {
            if let Some(asset) = child.get(&name) {
                layer.set(name, asset);
            }
        }
    }
    Some(OptionValue::Assets(Rc::new(layer)))
}

fn merge_data_field(parent: Option<OptionValue>, child: Option<OptionValue>) -> Option<OptionValue> {
    match (parent, child) {
        (Some(OptionValue::Value(parent)), Some(OptionValue::Value(child))) => {
            Some(OptionValue::Value(merge_data(child, &parent)))
        }
        (parent, None) => parent,
        (_, child) => child,
    }
}

/// Fill `to` with entries of `from` it lacks, recursing into nested objects.
///
/// Values already present in `to` win. Non-object inputs return `to` unchanged.
pub fn merge_data(to: Value, from: &Value) -> Value {
    match (to, from) {
        (Value::Object(mut to), Value::Object(from)) => {
            for (key, from_value) in from {
                match to.get_mut(key) {
                    None => {
                        to.insert(key.clone(), from_value.clone());
                    }
                    Some(to_value) => {
                        if to_value.is_object() && from_value.is_object() && to_value != from_value {
                            let nested = merge_data(to_value.take(), from_value);
                            *to_value = nested;
                        }
                    }
                }
            }
            Value::Object(to)
        }
        (to, _) => to,
    }
}

fn merge_keyed(key: &str, parent: Option<OptionValue>, child: Option<OptionValue>) -> Option<OptionValue> {
    let normalize_value = |value: Option<OptionValue>| match value {
        Some(OptionValue::Value(value)) => Some(OptionValue::Value(normalize(key, value))),
        other => other,
    };
    match (normalize_value(parent), normalize_value(child)) {
        (Some(OptionValue::Value(Value::Object(parent))), Some(OptionValue::Value(Value::Object(child)))) => {
            let mut out = parent;
            out.extend(child);
            Some(OptionValue::Value(Value::Object(out)))
        }
        (Some(OptionValue::Functions(parent)), Some(OptionValue::Functions(child))) => {
            let mut out = (*parent).clone();
            out.extend(child.iter().map(|(name, f)| (name.clone(), f.clone())));
            Some(OptionValue::Functions(Rc::new(out)))
        }
        (parent, None) => parent,
        (_, child) => child,
    }
}

/// Normalize list-style `props` / `inject` declarations into object form.
///
/// `props: ["a"]` becomes `{"a": {}}`; `inject: ["a"]` becomes
/// `{"a": {"from": "a"}}` and `inject: {"b": "a"}` becomes
/// `{"b": {"from": "a"}}`. Other keys and shapes pass through untouched.
pub fn normalize(key: &str, value: Value) -> Value {
    match (key, value) {
        (keys::PROPS, Value::Array(names)) => Value::Object(
            names
                .into_iter()
                .filter_map(|name| match name {
                    Value::String(name) => Some((name, Value::Object(Map::new()))),
                    _ => None,
                })
                .collect(),
        ),
        (keys::INJECT, Value::Array(names)) => Value::Object(
            names
                .into_iter()
                .filter_map(|name| match name {
                    Value::String(name) => {
                        let mut entry = Map::new();
                        entry.insert("from".to_string(), Value::String(name.clone()));
                        Some((name, Value::Object(entry)))
                    }
                    _ => None,
                })
                .collect(),
        ),
        (keys::INJECT, Value::Object(entries)) => Value::Object(
            entries
                .into_iter()
                .map(|(local, spec)| {
                    let entry = match spec {
                        Value::Object(mut spec) => {
                            if !spec.contains_key("from") {
                                spec.insert("from".to_string(), Value::String(local.clone()));
                            }
                            spec
                        }
                        other => {
                            let mut spec = Map::new();
                            spec.insert("from".to_string(), other);
                            spec
                        }
                    };
                    (local, Value::Object(entry))
                })
                .collect(),
        ),
        (_, value) => value,
    }
}

fn merge_watch(parent: Option<OptionValue>, child: Option<OptionValue>, concat: bool) -> Option<OptionValue> {
    match (parent, child) {
        (Some(OptionValue::Watch(parent)), Some(OptionValue::Watch(child))) => {
            let mut out: BTreeMap<String, Vec<_>> = (*parent).clone();
            for (key, handlers) in child.iter() {
                if concat {
                    out.entry(key.clone()).or_default().extend(handlers.iter().cloned());
                } else {
                    out.insert(key.clone(), handlers.clone());
                }
            }
            Some(OptionValue::Watch(Rc::new(out)))
        }
        (parent, None) => parent,
        (_, child) => child,
    }
}
