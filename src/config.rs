use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, UnifyError};

/// Default name of the container that receives externally sourced content.
pub const DEFAULT_DEFINITIONS_PATH: &str = "definitions";

/// Default separator used when joining segments into a definitions key.
pub const DEFAULT_DEFINITIONS_SEPARATOR: &str = "/";

/// Options consumed by the resolver.
///
/// On disk the options use camelCase keys (`definitionsPath`,
/// `definitionsPathSeparator`, `logs`); missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnifyOptions {
    /// Top-level key under which external schemas are nested.
    pub definitions_path: String,
    /// Separator placed between path segments of a definitions key.
    pub definitions_path_separator: String,
    /// Emit tracing events for every load, ref rewrite and path computation.
    pub logs: bool,
}

impl Default for UnifyOptions {
    fn default() -> Self {
        Self {
            definitions_path: DEFAULT_DEFINITIONS_PATH.to_string(),
            definitions_path_separator: DEFAULT_DEFINITIONS_SEPARATOR.to_string(),
            logs: false,
        }
    }
}

impl UnifyOptions {
    /// Checks that the options can produce well-formed destination pointers.
    pub fn validate(&self) -> Result<()> {
        if self.definitions_path.is_empty() {
            return Err(UnifyError::Config {
                message: "definitions path must not be empty".to_string(),
            });
        }
        if self.definitions_path.contains('/') {
            return Err(UnifyError::Config {
                message: format!(
                    "definitions path '{}' must be a single key and cannot contain '/'",
                    self.definitions_path
                ),
            });
        }
        if self.definitions_path_separator.is_empty() {
            return Err(UnifyError::Config {
                message: "definitions path separator must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads options from a JSON or YAML file.
///
/// Files ending in `.json` are parsed as JSON, everything else as YAML. The
/// result is validated before it is returned.
pub fn load_options(path: &Path) -> Result<UnifyOptions> {
    let contents = fs::read_to_string(path).map_err(|e| UnifyError::Config {
        message: format!("failed to read options file '{}': {}", path.display(), e),
    })?;

    let options: UnifyOptions = if is_json_path(path) {
        serde_json::from_str(&contents).map_err(|e| UnifyError::Config {
            message: format!("failed to parse options file '{}': {}", path.display(), e),
        })?
    } else {
        serde_yaml::from_str(&contents).map_err(|e| UnifyError::Config {
            message: format!("failed to parse options file '{}': {}", path.display(), e),
        })?
    };

    options.validate()?;
    Ok(options)
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
