use std::fs;

use schema_unify::config::*;
use schema_unify::errors::UnifyError;
use tempfile::TempDir;

#[test]
fn test_default_options() {
    let options = UnifyOptions::default();
    assert_eq!(options.definitions_path, "definitions");
    assert_eq!(options.definitions_path_separator, "/");
    assert!(!options.logs);
    assert!(options.validate().is_ok());
}

#[test]
fn test_load_json_options_with_defaults_for_missing_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unify.json");
    fs::write(&path, r#"{"definitionsPath": "$defs", "logs": true}"#).unwrap();

    let options = load_options(&path).unwrap();
    assert_eq!(options.definitions_path, "$defs");
    assert_eq!(options.definitions_path_separator, "/");
    assert!(options.logs);
}

#[test]
fn test_load_yaml_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unify.yaml");
    fs::write(&path, "definitionsPathSeparator: \"_\"\n").unwrap();

    let options = load_options(&path).unwrap();
    assert_eq!(options.definitions_path, "definitions");
    assert_eq!(options.definitions_path_separator, "_");
}

#[test]
fn test_load_rejects_invalid_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unify.json");
    fs::write(&path, r#"{"definitionsPath": "a/b"}"#).unwrap();

    let err = load_options(&path).unwrap_err();
    assert!(matches!(err, UnifyError::Config { .. }), "got {:?}", err);
}

#[test]
fn test_load_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = load_options(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, UnifyError::Config { .. }), "got {:?}", err);
}

#[test]
fn test_validate_rejects_empty_values() {
    let empty_root = UnifyOptions {
        definitions_path: String::new(),
        ..UnifyOptions::default()
    };
    assert!(empty_root.validate().is_err());

    let empty_separator = UnifyOptions {
        definitions_path_separator: String::new(),
        ..UnifyOptions::default()
    };
    assert!(empty_separator.validate().is_err());
}

#[test]
fn test_options_serde_roundtrip_uses_camel_case() {
    let options = UnifyOptions::default();
    let json = serde_json::to_string_pretty(&options).unwrap();
    assert!(json.contains("definitionsPathSeparator"));
    let deserialized: UnifyOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(options, deserialized);
}
