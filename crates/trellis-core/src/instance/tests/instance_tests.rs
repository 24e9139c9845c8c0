use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::instance::{ComponentVNodeOptions, InstanceConfig, RenderProxy, VNode};
use crate::kernel::constants::keys;
use crate::kernel::error::Error;
use crate::kernel::{Runtime, RuntimeConfig};
use crate::options::{Options, callable};

fn runtime() -> Runtime {
    Runtime::new(RuntimeConfig::production())
}

#[test]
fn test_events_on_emit_off() {
    let runtime = runtime();
    let vm = runtime.new_instance(runtime.base(), InstanceConfig::empty()).expect("instance");
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();

    vm.on(
        "ping",
        callable(move |_, _| {
            *counter.borrow_mut() += 1;
            Ok(json!(null))
        }),
    );
    vm.emit("ping", &[]).expect("emit");
    vm.emit("unheard", &[]).expect("emit without listeners");
    assert_eq!(vm.listener_count("ping"), 1);
    assert!(!vm.has_hook_event());

    vm.off("ping");
    vm.emit("ping", &[]).expect("emit after off");
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_hook_listener_sets_flag() {
    let runtime = runtime();
    let vm = runtime.new_instance(runtime.base(), InstanceConfig::empty()).expect("instance");
    vm.on("hook:mounted", callable(|_, _| Ok(json!(null))));
    assert!(vm.has_hook_event());
}

#[test]
fn test_methods_and_computed() {
    let runtime = runtime();
    let options = Options::new()
        .with_value(keys::DATA, json!({"count": 2}))
        .with_method(
            "add",
            callable(|vm, args| {
                let count = vm.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
                let step = args.first().and_then(|v| v.as_i64()).unwrap_or(1);
                Ok(json!(count + step))
            }),
        )
        .with_computed(
            "double",
            callable(|vm, _| Ok(json!(vm.get("count").and_then(|v| v.as_i64()).unwrap_or(0) * 2))),
        );

    let vm = runtime.new_instance(runtime.base(), options).expect("instance");

    assert_eq!(vm.call_method("add", &[json!(3)]).expect("add"), json!(5));
    assert_eq!(vm.computed("double").expect("double"), json!(4));
    assert_eq!(vm.proxy_get("double"), Some(json!(4)));
    match vm.call_method("missing", &[]) {
        Err(Error::MethodNotFound { name, component }) => {
            assert_eq!(name, "missing");
            assert_eq!(component, "<Root>");
        }
        other => panic!("Expected MethodNotFound, got {:?}", other),
    }
}

#[test]
fn test_guarded_proxy_reports_unknown_keys() {
    let runtime = Runtime::new(RuntimeConfig::development().with_warn_handler(|_| {}));
    let vm = runtime
        .new_instance(runtime.base(), Options::new().with_value(keys::DATA, json!({"known": 1})))
        .expect("instance");

    assert_eq!(vm.render_proxy(), RenderProxy::Guarded);
    assert_eq!(vm.proxy_get("known"), Some(json!(1)));
    assert_eq!(vm.proxy_get("unknown"), None);
}

#[test]
fn test_display_names() {
    let runtime = runtime();
    let root = runtime.new_instance(runtime.base(), InstanceConfig::empty()).expect("root");
    let named = runtime
        .extend(runtime.base(), Options::new().with_value(keys::NAME, "todo-item").shared())
        .expect("named");
    let anonymous = runtime.extend(runtime.base(), Rc::new(Options::new())).expect("anonymous");
    let tagged = runtime.extend(runtime.base(), Rc::new(Options::new())).expect("tagged");

    let make = |ctor, tag: Option<&str>| {
        let mut placeholder = ComponentVNodeOptions::new(ctor);
        if let Some(tag) = tag {
            placeholder = placeholder.with_tag(tag);
        }
        runtime
            .create_component_instance(&root, Rc::new(VNode::component(placeholder)))
            .expect("child")
    };

    assert_eq!(root.display_name(), "<Root>");
    assert_eq!(make(named, None).display_name(), "<TodoItem>");
    assert_eq!(make(anonymous, None).display_name(), "<Anonymous>");
    assert_eq!(make(tagged, Some("side_bar")).display_name(), "<SideBar>");
}

#[test]
fn test_set_defines_new_keys_and_reports_watcher_errors() {
    let runtime = runtime();
    let vm = runtime.new_instance(runtime.base(), InstanceConfig::empty()).expect("instance");
    vm.watch("value", callable(|_, _| Err(Error::Other("rejected".into()))));

    assert!(vm.set("value", json!(1)).is_err());
    assert_eq!(vm.get("value"), Some(json!(1)), "State is updated before watchers run");
    assert_eq!(vm.watcher_count("value"), 1);
    assert!(vm.has("value"));
}
