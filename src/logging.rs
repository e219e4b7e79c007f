use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Install the global subscriber. Logs go to stderr; stdout carries the check result.
///
/// `RUST_LOG` takes precedence over the command-line level.
pub fn init(level: LogLevel) {
    let default = format!("error,{}={}", env!("CARGO_CRATE_NAME"), level.as_tracing());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}
