mod cli;
mod config;
mod error;
mod evaluate;
mod fetch;
mod logging;
mod model;
mod report;
mod runner;
mod types;

use std::io::Write;

use clap::Parser;
use cli::Cli;
use config::CheckConfig;
use tracing::debug;
use types::Severity;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprint!("{e}");
            exit_with(Severity::Unknown, "UNKNOWN: Invalid command line, see --help\n");
        }
    };

    logging::init(cli.effective_log_level());

    let cfg = match CheckConfig::resolve(&cli) {
        Ok(cfg) => cfg,
        Err(e) => exit_with(Severity::Unknown, &format!("{}: {e:#}\n", Severity::Unknown)),
    };

    debug!(
        url = %cfg.url,
        verbose = cfg.verbose,
        warning = cfg.thresholds.warning,
        critical = cfg.thresholds.critical,
        timeout = cfg.timeout.as_secs_f64(),
        "Entrypoint params"
    );

    let outcome = runner::run(&cfg).await;
    exit_with(outcome.severity, &outcome.output);
}

/// Write the result to stdout and terminate. Any still-running probe task goes down with the process.
fn exit_with(severity: Severity, output: &str) -> ! {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(output.as_bytes());
    let _ = stdout.flush();
    std::process::exit(severity.exit_code());
}
