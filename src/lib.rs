pub mod config;
pub mod errors;
pub mod loader;
pub mod naming;
pub mod output;
pub mod pointer;
pub mod resolution;
pub mod types;

pub use resolution::{unify, Resolution, SchemaResolver};
