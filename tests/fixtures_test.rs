use std::fs;
use std::path::PathBuf;

use schema_unify::config::UnifyOptions;
use schema_unify::output::{render, OutputFormat};
use schema_unify::unify;
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Unifies the multi-directory fixture tree (JSON and YAML files, refs into
/// the main schema, sibling and parent directories) and compares it with the
/// checked-in expectation byte for byte.
#[tokio::test]
async fn test_nested_fixture_matches_expected() {
    let unified = unify(fixture("nested/main.schema.json"), &UnifyOptions::default())
        .await
        .unwrap();

    let expected_text = fs::read_to_string(fixture("nested.expected.json")).unwrap();
    let expected: Value = serde_json::from_str(&expected_text).unwrap();
    assert_eq!(unified, expected);
    assert_eq!(render(&unified, OutputFormat::Json).unwrap(), expected_text);
}

#[tokio::test]
async fn test_nested_fixture_as_yaml_round_trips() {
    let unified = unify(fixture("nested/main.schema.json"), &UnifyOptions::default())
        .await
        .unwrap();

    let yaml = render(&unified, OutputFormat::Yaml).unwrap();
    let reparsed: Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(reparsed, unified);
}
