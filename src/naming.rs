use std::path::{Component, Path, PathBuf};

use crate::config::UnifyOptions;
use crate::errors::Result;
use crate::types::CanonicalRef;

/// Schema file suffixes removed from the last segment of a definitions key.
const SCHEMA_EXTENSIONS: [&str; 3] = [".json", ".yaml", ".yml"];

/// Computes destination pointers for canonical references.
///
/// References into the main schema keep their own pointer (`#/...`). Every
/// other reference is nested under the definitions root, keyed by its path
/// relative to the main schema file plus its fragment segments.
#[derive(Debug, Clone)]
pub struct PathNamer {
    main_schema: PathBuf,
    definitions_path: String,
    separator: String,
}

impl PathNamer {
    /// Creates a namer for the given (absolute) main schema path.
    pub fn new(main_schema: &Path, options: &UnifyOptions) -> Self {
        Self {
            main_schema: main_schema.to_path_buf(),
            definitions_path: options.definitions_path.clone(),
            separator: options.definitions_path_separator.clone(),
        }
    }

    /// Returns the destination pointer for `reference`.
    pub fn new_path(&self, reference: &CanonicalRef) -> String {
        if reference.file_path() == self.main_schema {
            return format!("#{}", reference.pointer().unwrap_or_default());
        }

        let relative = relative_path(&self.main_schema, reference.file_path());
        let trimmed = strip_schema_extension(strip_parent_markers(&relative));

        let mut parts: Vec<&str> = trimmed.split('/').filter(|p| !p.is_empty()).collect();
        parts.extend(reference.raw_segments());

        format!("#/{}/{}", self.definitions_path, parts.join(self.separator.as_str()))
    }
}

/// Resolves `path` against the current directory and normalizes it.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    let cwd = std::env::current_dir()?;
    Ok(normalize_path(&cwd.join(path)))
}

/// Lexically normalizes a path: drops `.` components and folds `..` into
/// its parent. Symlinks are not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = normalized.components().next_back();
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                let has_parent = matches!(last, Some(Component::Normal(_)));
                if has_parent {
                    normalized.pop();
                } else if !at_root {
                    // Leading `..` of a relative path is kept; at the root it is dropped.
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Relative path from `from` to `to`, both treated as directories, joined
/// with `/`.
///
/// Because `from` is usually a file, references next to the main schema
/// come out as `../name.json`; the leading markers are stripped later.
/// Components that are not valid UTF-8 are converted lossily, so two such
/// files may map to the same name; registration reports that as a
/// `NamingCollision`.
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = std::iter::repeat("..".to_string()).take(from.len() - common);
    let downs = to[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().to_string());

    ups.chain(downs).collect::<Vec<_>>().join("/")
}

/// Strips a leading run of dot-directory markers such as `../` or `./`.
pub fn strip_parent_markers(path: &str) -> &str {
    let mut rest = path;
    loop {
        let dots = rest.chars().take_while(|c| *c == '.').count();
        if dots == 0 {
            return rest;
        }
        match rest[dots..].chars().next() {
            Some('/') | Some('\\') => rest = &rest[dots + 1..],
            _ => return rest,
        }
    }
}

/// Strips a trailing `.json`, `.yaml` or `.yml` suffix, together with a
/// preceding `.schema`, ignoring ASCII case.
pub fn strip_schema_extension(path: &str) -> &str {
    let lower = path.to_ascii_lowercase();
    for ext in SCHEMA_EXTENSIONS {
        if let Some(stem) = lower.strip_suffix(ext) {
            let stem_len = stem.strip_suffix(".schema").unwrap_or(stem).len();
            return &path[..stem_len];
        }
    }
    path
}
