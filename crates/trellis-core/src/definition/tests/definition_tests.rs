use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};

use crate::definition::{ComponentDefinition, DefinitionError, DefinitionFormat, HookBinder, LoggingBinder};
use crate::instance::InstanceConfig;
use crate::kernel::constants::keys;
use crate::kernel::{Runtime, RuntimeConfig};
use crate::options::{Asset, AssetKind, Callable, HookFn, LifecycleHook, callable};

/// Binder that records which hooks ran.
struct JournalBinder {
    journal: Rc<RefCell<Vec<String>>>,
}

impl HookBinder for JournalBinder {
    fn hook(&self, stage: LifecycleHook, label: &str) -> HookFn {
        let journal = self.journal.clone();
        let entry = format!("{}:{}", stage, label);
        HookFn::new(label, move |_| {
            journal.borrow_mut().push(entry.clone());
            Ok(())
        })
    }

    fn method(&self, name: &str) -> Callable {
        let name = name.to_string();
        callable(move |_, _| Ok(Value::String(name.clone())))
    }

    fn watcher(&self, _key: &str, _label: &str) -> Callable {
        callable(|_, _| Ok(Value::Null))
    }
}

fn parse(json: &str) -> ComponentDefinition {
    DefinitionFormat::Json.parse(json).expect("parse")
}

#[test]
fn test_plain_fields_become_option_values() {
    let definition = parse(r##"{"name": "app", "el": "#app", "data": {"a": 1}, "abstract": true, "custom": [1]}"##);

    let options = definition.to_options(&LoggingBinder).expect("options");

    assert_eq!(options.name().as_deref(), Some("app"));
    assert_eq!(options.el().as_deref(), Some("#app"));
    assert_eq!(options.data(), Some(json!({"a": 1})));
    assert!(options.is_abstract());
    assert_eq!(options.value("custom"), Some(json!([1])), "Unknown keys are kept as data");
}

#[test]
fn test_hooks_bound_in_order() {
    let journal = Rc::new(RefCell::new(Vec::new()));
    let binder = JournalBinder {
        journal: journal.clone(),
    };
    let definition = parse(r#"{"hooks": {"created": ["first", "second"], "beforeCreate": ["early"]}}"#);
    let options = definition.to_options(&binder).expect("options");

    let runtime = Runtime::new(RuntimeConfig::production());
    let ctor = runtime.extend(runtime.base(), options).expect("extend");
    runtime.new_instance(ctor, InstanceConfig::empty()).expect("instance");

    assert_eq!(
        *journal.borrow(),
        vec!["beforeCreate:early", "created:first", "created:second"]
    );
}

#[test]
fn test_unknown_hook_is_rejected() {
    let definition = parse(r#"{"hooks": {"afterCreate": ["x"]}}"#);
    match definition.to_options(&LoggingBinder) {
        Err(DefinitionError::UnknownHook { name }) => assert_eq!(name, "afterCreate"),
        Err(other) => panic!("Expected UnknownHook, got {}", other),
        Ok(_) => panic!("Expected UnknownHook"),
    }
}

#[test]
fn test_methods_watch_and_template() {
    let definition = parse(r#"{"methods": ["save"], "watch": {"count": ["a", "b"]}, "template": "<p>hi</p>"}"#);

    let options = definition.to_options(&LoggingBinder).expect("options");

    assert!(options.methods().expect("methods").contains_key("save"));
    assert_eq!(options.watch().expect("watch")["count"].len(), 2);
    assert!(options.render().is_some(), "The logging binder renders templates as text");
    assert_eq!(options.value(keys::TEMPLATE), Some(json!("<p>hi</p>")));
}

#[test]
fn test_nested_components_mixins_and_extends() {
    let definition = parse(
        r#"{
            "components": {"child": {"name": "child"}},
            "directives": {"focus": true},
            "mixins": [{"data": {"m": 1}}],
            "extends": {"data": {"e": 1}}
        }"#,
    );

    let options = definition.to_options(&LoggingBinder).expect("options");

    let components = options.components().expect("components");
    assert!(matches!(components.get("child"), Some(Asset::Definition(_))));
    assert!(options.assets(AssetKind::Directive).expect("directives").has("focus"));
    assert_eq!(options.mixins().expect("mixins").len(), 1);
    assert_eq!(options.extends().expect("extends").data(), Some(json!({"e": 1})));

    let runtime = Runtime::new(RuntimeConfig::production());
    let vm = runtime.new_instance(runtime.base(), options).expect("instance");
    assert_eq!(vm.get("m"), Some(json!(1)));
    assert_eq!(vm.get("e"), Some(json!(1)));
}
