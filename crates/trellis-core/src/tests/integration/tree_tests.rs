#![cfg(test)]

use std::rc::Rc;

use serde_json::json;

use super::common::{journal, recording_hook};
use crate::instance::{ComponentVNodeOptions, InstanceConfig, VNode};
use crate::kernel::constants::keys;
use crate::kernel::{Runtime, RuntimeConfig};
use crate::options::{LifecycleHook, Options, render_fn};

#[test]
fn test_rendered_tree_instantiates_children_in_order() {
    let runtime = Runtime::new(RuntimeConfig::production());
    let calls = journal();
    let item = runtime
        .extend(
            runtime.base(),
            Options::new()
                .with_value(keys::NAME, "item")
                .with_value(keys::PROPS, json!(["label"]))
                .with_hook(LifecycleHook::Created, recording_hook(&calls, "item created"))
                .with_hook(LifecycleHook::Mounted, recording_hook(&calls, "item mounted"))
                .with_render(render_fn(|vm| {
                    let label = vm.proxy_get("label").and_then(|v| v.as_str().map(str::to_string));
                    Ok(VNode::text(label.unwrap_or_default()))
                }))
                .shared(),
        )
        .expect("item");

    let root_options = Options::new()
        .with_value(keys::EL, "#app")
        .with_hook(LifecycleHook::Created, recording_hook(&calls, "root created"))
        .with_hook(LifecycleHook::Mounted, recording_hook(&calls, "root mounted"))
        .with_render(render_fn(move |_| {
            Ok(VNode::element(
                "ul",
                vec![
                    VNode::component(ComponentVNodeOptions::new(item).with_props(json!({"label": "one"}))),
                    VNode::component(ComponentVNodeOptions::new(item).with_props(json!({"label": "two"}))),
                ],
            ))
        }));

    let root = runtime.new_instance(runtime.base(), root_options).expect("root");
    let children = runtime.instantiate_children(&root).expect("children");

    assert_eq!(children.len(), 2);
    assert_eq!(
        *calls.borrow(),
        vec![
            "root created",
            "root mounted",
            "item created",
            "item mounted",
            "item created",
            "item mounted"
        ]
    );
    let labels: Vec<_> = children
        .iter()
        .map(|child| child.vnode().and_then(|v| v.text).unwrap_or_default())
        .collect();
    assert_eq!(labels, vec!["one", "two"]);
    assert!(children.iter().all(|child| child.mount_target().as_deref() == Some("#app")));
    assert!(children.iter().all(|child| Rc::ptr_eq(&child.root().expect("root"), &root)));
}

#[test]
fn test_provide_flows_through_rendered_tree() {
    let runtime = Runtime::new(RuntimeConfig::production());
    let leaf = runtime
        .extend(
            runtime.base(),
            Options::new()
                .with_value(keys::INJECT, json!(["theme"]))
                .with_render(render_fn(|_| Ok(VNode::element("span", vec![]))))
                .shared(),
        )
        .expect("leaf");
    let middle = runtime
        .extend(
            runtime.base(),
            Options::new()
                .with_render(render_fn(move |_| Ok(VNode::component(ComponentVNodeOptions::new(leaf)))))
                .shared(),
        )
        .expect("middle");
    let root = runtime
        .new_instance(
            runtime.base(),
            Options::new()
                .with_value(keys::EL, "#app")
                .with_value(keys::PROVIDE, json!({"theme": "dark"}))
                .with_render(render_fn(move |_| Ok(VNode::component(ComponentVNodeOptions::new(middle))))),
        )
        .expect("root");

    let children = runtime.instantiate_children(&root).expect("children");
    let grandchildren = children[0].children();

    assert_eq!(grandchildren.len(), 1);
    assert_eq!(grandchildren[0].get("theme"), Some(json!("dark")));
}

#[test]
fn test_unrendered_instance_has_no_children() {
    let runtime = Runtime::new(RuntimeConfig::production());
    let vm = runtime.new_instance(runtime.base(), InstanceConfig::empty()).expect("instance");
    assert!(runtime.instantiate_children(&vm).expect("children").is_empty());
}
