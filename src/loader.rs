use std::path::Path;

use serde_json::Value;

use crate::errors::{Result, UnifyError};

/// Serialization format of a schema document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from the file extension.
    ///
    /// Only `.json` files are read as JSON; any other extension is read as
    /// YAML, which also accepts plain JSON content.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

/// Reads and parses the schema document at `path`.
pub async fn load_document(path: &Path) -> Result<Value> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| UnifyError::File {
            message: format!("failed to read schema: {}", e),
            path: path.display().to_string(),
        })?;
    parse_document(path, &contents)
}

/// Parses `contents` according to the format implied by `path`.
pub fn parse_document(path: &Path, contents: &str) -> Result<Value> {
    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => serde_json::from_str(contents).map_err(|e| UnifyError::Parse {
            message: e.to_string(),
            path: path.display().to_string(),
            line: Some(e.line()),
        }),
        DocumentFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| UnifyError::Parse {
            message: e.to_string(),
            path: path.display().to_string(),
            line: e.location().map(|loc| loc.line()),
        }),
    }
}
