use std::path::Path;

use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::errors::{Result, UnifyError};

/// Output target that stands for standard output.
pub const STDOUT_TARGET: &str = "-";

/// Text format of the unified schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[allow(clippy::should_implement_trait)]
impl OutputFormat {
    /// Returns the string representation of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    /// Parses a format name, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    /// Infers a format from a file extension, if it is a known one.
    pub fn from_extension(path: &Path) -> Option<OutputFormat> {
        let ext = path.extension()?.to_str()?;
        OutputFormat::from_str(ext)
    }
}

/// Picks the output format from the target path and an optional explicit
/// format.
///
/// An explicit format wins unless it contradicts a known extension, which is
/// a usage error. Without one, the extension decides; standard output
/// defaults to JSON.
pub fn resolve_format(output: &str, explicit: Option<&str>) -> Result<OutputFormat> {
    let explicit = match explicit {
        Some(name) => Some(OutputFormat::from_str(name).ok_or_else(|| UnifyError::Usage {
            message: format!("unknown output format '{}' (expected json or yaml)", name),
        })?),
        None => None,
    };

    let inferred = if output == STDOUT_TARGET {
        None
    } else {
        OutputFormat::from_extension(Path::new(output))
    };

    match (explicit, inferred) {
        (Some(e), Some(i)) if e != i => Err(UnifyError::Usage {
            message: format!(
                "format '{}' does not match the extension of output '{}'",
                e.as_str(),
                output
            ),
        }),
        (Some(format), _) | (None, Some(format)) => Ok(format),
        (None, None) if output == STDOUT_TARGET => Ok(OutputFormat::Json),
        (None, None) => Err(UnifyError::Usage {
            message: format!(
                "cannot infer output format from '{}'; pass --format json or --format yaml",
                output
            ),
        }),
    }
}

/// Serializes the unified schema. JSON is pretty-printed.
pub fn render(document: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(document)?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
    }
}

/// Writes rendered text to a file, or to standard output for `-`.
pub async fn write_output(target: &str, text: &str) -> Result<()> {
    if target == STDOUT_TARGET {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        return Ok(());
    }

    tokio::fs::write(target, text)
        .await
        .map_err(|e| UnifyError::File {
            message: format!("failed to write unified schema: {}", e),
            path: target.to_string(),
        })
}
