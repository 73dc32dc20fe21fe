use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::OutputFormat;

/// Directive used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber. Logs go to stderr so that stdout only carries the
/// evaluation output, and are JSON-formatted alongside JSONL output.
pub fn setup_logging(format: &OutputFormat) -> Result<()> {
    let builder = tracing_subscriber::FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter());
    let result = match format {
        OutputFormat::Jsonl => tracing::subscriber::set_global_default(builder.json().finish()),
        OutputFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
    };
    result.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
