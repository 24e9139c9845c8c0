#![cfg(test)]

use std::rc::Rc;

use serde_json::json;

use super::common::{journal, options_with_hook, warning_runtime};
use crate::instance::InstanceConfig;
use crate::kernel::constants::keys;
use crate::kernel::{Runtime, RuntimeConfig};
use crate::options::{LifecycleHook, OptionValue, Options};

#[test]
fn test_instances_receive_strictly_increasing_ids() {
    let runtime = Runtime::new(RuntimeConfig::production());
    let sub = runtime.extend(runtime.base(), Rc::new(Options::new())).expect("extend");

    let first = runtime.new_instance(runtime.base(), InstanceConfig::empty()).expect("first");
    let second = runtime.new_instance(sub, InstanceConfig::empty()).expect("second");
    let third = runtime.call_constructor(sub, InstanceConfig::empty()).expect("third");

    assert!(first.uid() < second.uid());
    assert!(second.uid() < third.uid());
}

#[test]
fn test_resolution_is_cached_until_an_ancestor_changes() {
    let runtime = Runtime::new(RuntimeConfig::production());
    let middle = runtime
        .extend(runtime.base(), Options::new().with_value(keys::NAME, "middle").shared())
        .expect("middle");
    let leaf = runtime
        .extend(middle, Options::new().with_value(keys::NAME, "leaf").shared())
        .expect("leaf");

    let first = runtime.store().resolve(leaf).expect("first");
    let second = runtime.store().resolve(leaf).expect("second");
    assert!(Rc::ptr_eq(&first, &second));

    runtime
        .mixin(middle, Options::new().with_value("fromMiddle", true).shared())
        .expect("mixin");
    let third = runtime.store().resolve(leaf).expect("third");
    assert!(!Rc::ptr_eq(&second, &third));
    assert_eq!(third.value("fromMiddle"), Some(json!(true)));
}

#[test]
fn test_late_modification_survives_global_mixin() {
    let runtime = Runtime::new(RuntimeConfig::production());
    let calls = journal();
    let sub = runtime
        .extend(runtime.base(), options_with_hook(&calls, LifecycleHook::Created, "sub").shared())
        .expect("extend");

    // patch the live constructor options after declaration
    let live = runtime.store().resolve(sub).expect("resolve");
    live.set("tagline", OptionValue::Value(json!("patched")));

    runtime
        .mixin(runtime.base(), options_with_hook(&calls, LifecycleHook::Created, "global").shared())
        .expect("mixin");
    let vm = runtime.new_instance(sub, InstanceConfig::empty()).expect("instance");

    assert_eq!(vm.options().value("tagline"), Some(json!("patched")));
    assert_eq!(*calls.borrow(), vec!["global", "sub"]);
}

#[test]
fn test_global_registration_does_not_leak_into_sibling_definitions() {
    let runtime = Runtime::new(RuntimeConfig::production());
    let card = runtime.component("card", Rc::new(Options::new())).expect("card");
    let local = Options::new().with_component("local-only", Rc::new(Options::new()));

    let vm = runtime.new_instance(runtime.base(), local).expect("instance");
    let other = runtime.new_instance(runtime.base(), InstanceConfig::empty()).expect("other");

    assert_eq!(runtime.component_constructor(&vm, "card").expect("lookup"), Some(card));
    assert!(runtime.component_constructor(&vm, "local-only").expect("lookup").is_some());
    assert!(runtime.component_constructor(&other, "local-only").expect("lookup").is_none());
    let base = runtime.store().options(runtime.base()).expect("base");
    assert!(!base.components().expect("registry").has("local-only"));
}

#[test]
fn test_call_without_new_warns_exactly_once() {
    let (runtime, warnings) = warning_runtime();

    let vm = runtime.call_constructor(runtime.base(), InstanceConfig::empty()).expect("instance");

    assert_eq!(warnings.borrow().len(), 1);
    assert!(vm.self_ref().is_some());
    assert!(vm.is_observation_exempt());
}
