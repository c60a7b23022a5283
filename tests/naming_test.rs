use std::path::{Path, PathBuf};

use schema_unify::config::UnifyOptions;
use schema_unify::naming::*;
use schema_unify::types::CanonicalRef;

fn namer(main: &str) -> PathNamer {
    PathNamer::new(Path::new(main), &UnifyOptions::default())
}

#[test]
fn test_main_file_maps_to_root() {
    let n = namer("/repo/schemas/main.schema.json");
    let main = CanonicalRef::file("/repo/schemas/main.schema.json");
    assert_eq!(n.new_path(&main), "#");
}

#[test]
fn test_main_fragment_keeps_its_pointer() {
    let n = namer("/repo/schemas/main.schema.json");
    let local = CanonicalRef::fragment("/repo/schemas/main.schema.json", "/definitions/x");
    assert_eq!(n.new_path(&local), "#/definitions/x");
}

#[test]
fn test_sibling_file_strips_schema_suffix() {
    let n = namer("/repo/schemas/main.schema.json");
    let part = CanonicalRef::file("/repo/schemas/part.schema.json");
    assert_eq!(n.new_path(&part), "#/definitions/part");
}

#[test]
fn test_subdirectory_fragment_appends_pointer_segments() {
    let n = namer("/repo/main.schema.json");
    let foo = CanonicalRef::fragment("/repo/sub/part.schema.json", "/definitions/foo");
    assert_eq!(n.new_path(&foo), "#/definitions/sub/part/definitions/foo");
}

#[test]
fn test_parent_directory_markers_are_dropped() {
    let n = namer("/repo/a/b/main.json");
    let shared = CanonicalRef::file("/repo/shared/types.yaml");
    assert_eq!(n.new_path(&shared), "#/definitions/shared/types");
}

#[test]
fn test_custom_root_and_separator() {
    let options = UnifyOptions {
        definitions_path: "$defs".to_string(),
        definitions_path_separator: "__".to_string(),
        logs: false,
    };
    let n = PathNamer::new(Path::new("/repo/main.json"), &options);
    let reference = CanonicalRef::fragment("/repo/types/common.yml", "properties//id/");
    assert_eq!(n.new_path(&reference), "#/$defs/types__common__properties__id");
}

#[test]
fn test_relative_path_measures_from_main_file() {
    assert_eq!(
        relative_path(Path::new("/a/main.json"), Path::new("/a/part.json")),
        "../part.json"
    );
    assert_eq!(
        relative_path(Path::new("/a/x/main.json"), Path::new("/a/sub/part.json")),
        "../../sub/part.json"
    );
    assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/b")), "");
}

#[test]
fn test_strip_parent_markers() {
    assert_eq!(strip_parent_markers("../../sub/part.json"), "sub/part.json");
    assert_eq!(strip_parent_markers("./part.json"), "part.json");
    assert_eq!(strip_parent_markers(".hidden/part.json"), ".hidden/part.json");
    assert_eq!(strip_parent_markers("part.json"), "part.json");
}

#[test]
fn test_strip_schema_extension() {
    assert_eq!(strip_schema_extension("part.schema.json"), "part");
    assert_eq!(strip_schema_extension("sub/Part.Schema.JSON"), "sub/Part");
    assert_eq!(strip_schema_extension("types.yaml"), "types");
    assert_eq!(strip_schema_extension("types.yml"), "types");
    assert_eq!(strip_schema_extension("notes.schema.txt"), "notes.schema.txt");
    assert_eq!(strip_schema_extension("schema.json"), "schema");
}

#[test]
fn test_normalize_path_folds_dot_segments() {
    assert_eq!(
        normalize_path(Path::new("/repo/sub/./../shared/x.json")),
        PathBuf::from("/repo/shared/x.json")
    );
    assert_eq!(normalize_path(Path::new("/../x.json")), PathBuf::from("/x.json"));
    assert_eq!(
        normalize_path(Path::new("../../x.json")),
        PathBuf::from("../../x.json")
    );
}

#[test]
fn test_absolute_path_is_absolute() {
    let resolved = absolute_path(Path::new("schemas/../main.json")).unwrap();
    assert!(resolved.is_absolute());
    assert!(resolved.ends_with("main.json"));
    assert!(!resolved.to_string_lossy().contains(".."));
}

#[test]
fn test_canonical_refs_compare_by_normalized_pointer() {
    let a = CanonicalRef::fragment("/repo/a.json", "/definitions/x");
    let b = CanonicalRef::fragment("/repo/a.json", "definitions//x");
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "/repo/a.json#/definitions/x");

    let whole = CanonicalRef::fragment("/repo/a.json", "/");
    assert!(!whole.is_fragment());
    assert_eq!(whole, CanonicalRef::file("/repo/a.json"));
}

#[test]
fn test_descendant_detection() {
    let parent = CanonicalRef::fragment("/repo/a.json", "/definitions");
    let child = CanonicalRef::fragment("/repo/a.json", "/definitions/x");
    let other_file = CanonicalRef::fragment("/repo/b.json", "/definitions/x");

    assert!(child.is_descendant_of(&parent));
    assert!(!parent.is_descendant_of(&child));
    assert!(!child.is_descendant_of(&child));
    assert!(!other_file.is_descendant_of(&parent));
    assert!(!child.is_descendant_of(&CanonicalRef::file("/repo/a.json")));
}
