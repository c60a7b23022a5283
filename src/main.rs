use clap::Parser;
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use schema_unify::config::{load_options, UnifyOptions};
use schema_unify::errors::{Result, UnifyError};
use schema_unify::output::{render, resolve_format, write_output};

/// Flattens a JSON Schema and every schema it references into one document.
#[derive(Parser)]
#[command(
    name = "schema-unify",
    version,
    about = "Flattens a JSON Schema and every schema it references into one document"
)]
struct Cli {
    /// Path to the main schema (JSON or YAML)
    schema: Option<String>,
    /// Output file, or `-` for standard output
    #[arg(short, long)]
    output: Option<String>,
    /// Output format (json or yaml); inferred from the output extension if omitted
    #[arg(short, long)]
    format: Option<String>,
    /// Log every load, ref rewrite and path computation to stderr
    #[arg(short, long)]
    verbose: bool,
    /// Key under which referenced schemas are nested
    #[arg(long)]
    definitions_path: Option<String>,
    /// Separator used to join path segments of a definitions key
    #[arg(long)]
    separator: Option<String>,
    /// Options file (JSON or YAML) with definitionsPath, definitionsPathSeparator and logs
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let schema = cli.schema.ok_or_else(|| UnifyError::Usage {
        message: "no schema provided".to_string(),
    })?;
    let output = cli.output.ok_or_else(|| UnifyError::Usage {
        message: "no output path provided (use `-o -` for standard output)".to_string(),
    })?;
    if output.is_empty() {
        return Err(UnifyError::Usage {
            message: "output path must not be empty".to_string(),
        });
    }
    let format = resolve_format(&output, cli.format.as_deref())?;

    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => UnifyOptions::default(),
    };
    if let Some(definitions_path) = cli.definitions_path {
        options.definitions_path = definitions_path;
    }
    if let Some(separator) = cli.separator {
        options.definitions_path_separator = separator;
    }
    options.logs |= cli.verbose;
    options.validate()?;

    tracing::debug!(schema = %schema, output = %output, format = format.as_str(), "unify");

    let unified = schema_unify::unify(&schema, &options).await?;
    let text = render(&unified, format)?;
    write_output(&output, &text).await
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "schema_unify=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
