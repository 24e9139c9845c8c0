use std::fs;
use std::path::Path;

use tempfile::tempdir;

use crate::definition::{DefinitionError, DefinitionFormat, load_definition};

#[test]
fn test_format_from_extension() {
    assert_eq!(DefinitionFormat::from_path(Path::new("app.json")), Some(DefinitionFormat::Json));
    assert_eq!(DefinitionFormat::from_path(Path::new("APP.JSON")), Some(DefinitionFormat::Json));
    #[cfg(feature = "yaml-definitions")]
    assert_eq!(DefinitionFormat::from_path(Path::new("app.yml")), Some(DefinitionFormat::Yaml));
    #[cfg(feature = "toml-definitions")]
    assert_eq!(DefinitionFormat::from_path(Path::new("app.toml")), Some(DefinitionFormat::Toml));
    assert_eq!(DefinitionFormat::from_path(Path::new("app.ini")), None);
    assert_eq!(DefinitionFormat::from_path(Path::new("app")), None);
}

#[test]
fn test_load_json_definition() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("app.json");
    fs::write(
        &path,
        r##"{"name": "app", "el": "#app", "data": {"count": 1}, "hooks": {"created": ["greet"]}}"##,
    )
    .expect("Failed to write definition");

    let definition = load_definition(&path).expect("load");

    assert_eq!(definition.name.as_deref(), Some("app"));
    assert_eq!(definition.el.as_deref(), Some("#app"));
    assert_eq!(definition.hooks["created"], vec!["greet".to_string()]);
}

#[cfg(feature = "yaml-definitions")]
#[test]
fn test_load_yaml_definition() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("panel.yaml");
    fs::write(
        &path,
        "name: panel\nabstract: true\nprops: [title]\ncomponents:\n  header:\n    template: '<h1/>'\n",
    )
    .expect("Failed to write definition");

    let definition = load_definition(&path).expect("load");

    assert!(definition.is_abstract);
    assert_eq!(definition.props, Some(serde_json::json!(["title"])));
    assert_eq!(definition.components["header"].template.as_deref(), Some("<h1/>"));
}

#[cfg(feature = "toml-definitions")]
#[test]
fn test_load_toml_definition() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("card.toml");
    fs::write(
        &path,
        "name = \"card\"\nmethods = [\"toggle\"]\n\n[data]\nopen = false\n\n[watch]\nopen = [\"log-open\"]\n",
    )
    .expect("Failed to write definition");

    let definition = load_definition(&path).expect("load");

    assert_eq!(definition.methods, vec!["toggle".to_string()]);
    assert_eq!(definition.data, Some(serde_json::json!({"open": false})));
    assert_eq!(definition.watch["open"], vec!["log-open".to_string()]);
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("app.ini");
    fs::write(&path, "name=app").expect("Failed to write definition");

    assert!(matches!(load_definition(&path), Err(DefinitionError::UnsupportedFormat { .. })));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("absent.json");

    assert!(matches!(load_definition(&path), Err(DefinitionError::Io { .. })));
}

#[test]
fn test_malformed_json() {
    let result = DefinitionFormat::Json.parse("{\"name\": ");
    match result {
        Err(DefinitionError::Parse { format, .. }) => assert_eq!(format, "JSON"),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_canonical_extension_maps_back_to_format() {
    let mut formats = vec![DefinitionFormat::Json];
    #[cfg(feature = "yaml-definitions")]
    formats.push(DefinitionFormat::Yaml);
    #[cfg(feature = "toml-definitions")]
    formats.push(DefinitionFormat::Toml);

    for format in formats {
        let file = format!("component.{}", format.extension());
        assert_eq!(DefinitionFormat::from_path(Path::new(&file)), Some(format));
    }
}
