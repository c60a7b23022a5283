/// Reference resolution module.
///
/// Discovers every schema reachable from a main schema through `$ref`,
/// rewrites each reference to a pointer inside a single document, and
/// assembles that document.
mod resolver;

use std::path::Path;

use serde_json::Value;

use crate::config::UnifyOptions;
use crate::errors::Result;

pub use resolver::{Resolution, SchemaResolver};

/// Unifies the schema at `schema_path` and everything it references into a
/// single document.
///
/// Fails without a partial result if any file cannot be read or parsed, if
/// a pointer does not resolve, or if two references would land on the same
/// destination.
pub async fn unify(schema_path: impl AsRef<Path>, options: &UnifyOptions) -> Result<Value> {
    SchemaResolver::new(schema_path.as_ref(), options.clone())?
        .unify()
        .await
}
