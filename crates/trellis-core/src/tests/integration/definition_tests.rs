#![cfg(test)]

use std::fs;

use serde_json::json;
use tempfile::tempdir;

use crate::definition::{LoggingBinder, load_definition};
use crate::kernel::{Runtime, RuntimeConfig};

#[test]
fn test_definition_file_to_mounted_tree() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("app.json");
    fs::write(
        &path,
        r##"{
            "name": "app",
            "el": "#app",
            "data": {"title": "Todo"},
            "provide": {"store": "memory"},
            "hooks": {"created": ["boot"], "mounted": ["ready"]},
            "components": {
                "todo-list": {"inject": ["store"], "template": "<ul/>"}
            },
            "template": "<todo-list/>"
        }"##,
    )
    .expect("Failed to write definition");

    let definition = load_definition(&path).expect("load");
    let options = definition.to_options(&LoggingBinder).expect("options");
    let runtime = Runtime::new(RuntimeConfig::production());
    let app = runtime.extend(runtime.base(), options).expect("extend");
    let vm = runtime.new_instance(app, crate::instance::InstanceConfig::empty()).expect("instance");

    assert!(vm.is_mounted());
    assert_eq!(vm.get("title"), Some(json!("Todo")));
    assert_eq!(vm.provided("store"), Some(json!("memory")));
    let list = runtime.component_constructor(&vm, "todo-list").expect("lookup");
    assert!(list.is_some());
    assert_eq!(runtime.component_constructor(&vm, "app").expect("lookup"), Some(app));
}
