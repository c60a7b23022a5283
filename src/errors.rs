use thiserror::Error;

/// Errors that can occur while unifying a schema tree.
#[derive(Error, Debug)]
pub enum UnifyError {
    #[error("usage error: {message}")]
    Usage { message: String },

    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("parse error: {message} (path: {path}, line: {line:?})")]
    Parse {
        message: String,
        path: String,
        line: Option<usize>,
    },

    #[error("broken reference: {reference} (missing segment: {segment})")]
    BrokenReference { reference: String, segment: String },

    #[error("naming collision: {first} and {second} both map to {new_path}")]
    NamingCollision {
        first: String,
        second: String,
        new_path: String,
    },

    #[error("graft conflict: {message} (destination: {new_path})")]
    GraftConflict { message: String, new_path: String },

    #[error("unsupported reference: {reference} (only local files and JSON pointers are resolved)")]
    UnsupportedReference { reference: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results using `UnifyError`.
pub type Result<T> = std::result::Result<T, UnifyError>;
