use schema_unify::errors::UnifyError;
use schema_unify::output::*;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_format_inferred_from_extension() {
    assert_eq!(resolve_format("out.json", None).unwrap(), OutputFormat::Json);
    assert_eq!(resolve_format("out.yaml", None).unwrap(), OutputFormat::Yaml);
    assert_eq!(resolve_format("out.YML", None).unwrap(), OutputFormat::Yaml);
}

#[test]
fn test_stdout_defaults_to_json() {
    assert_eq!(resolve_format("-", None).unwrap(), OutputFormat::Json);
    assert_eq!(resolve_format("-", Some("yaml")).unwrap(), OutputFormat::Yaml);
}

#[test]
fn test_explicit_format_with_unknown_extension() {
    assert_eq!(resolve_format("out.txt", Some("json")).unwrap(), OutputFormat::Json);
    assert_eq!(resolve_format("unified", Some("yaml")).unwrap(), OutputFormat::Yaml);
}

#[test]
fn test_format_extension_mismatch_is_usage_error() {
    let err = resolve_format("out.json", Some("yaml")).unwrap_err();
    assert!(matches!(err, UnifyError::Usage { .. }), "got {:?}", err);
}

#[test]
fn test_unknown_format_is_usage_error() {
    let err = resolve_format("out.json", Some("toml")).unwrap_err();
    assert!(matches!(err, UnifyError::Usage { .. }), "got {:?}", err);
}

#[test]
fn test_uninferable_format_is_usage_error() {
    let err = resolve_format("out.txt", None).unwrap_err();
    assert!(matches!(err, UnifyError::Usage { .. }), "got {:?}", err);
}

#[test]
fn test_render_json_is_pretty() {
    let text = render(&json!({"type": "string"}), OutputFormat::Json).unwrap();
    assert_eq!(text, "{\n  \"type\": \"string\"\n}\n");
}

#[test]
fn test_render_yaml() {
    let text = render(
        &json!({"type": "object", "required": ["a"]}),
        OutputFormat::Yaml,
    )
    .unwrap();
    assert_eq!(text, "type: object\nrequired:\n- a\n");
}

#[tokio::test]
async fn test_write_output_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unified.schema.json");
    let target = path.to_string_lossy().to_string();

    write_output(&target, "{}\n").await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
}

#[tokio::test]
async fn test_write_output_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let target = dir
        .path()
        .join("missing/unified.json")
        .to_string_lossy()
        .to_string();

    let err = write_output(&target, "{}").await.unwrap_err();
    assert!(matches!(err, UnifyError::File { .. }), "got {:?}", err);
}
