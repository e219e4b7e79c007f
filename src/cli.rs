use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "check_xml_api",
    version,
    about = "Nagios check for HTTP endpoints reporting application status as XML"
)]
pub struct Cli {
    /// URL to check
    #[arg(short = 'U', long)]
    pub url: Option<String>,

    /// Timeout in seconds, fractions allowed [default: 30]
    #[arg(short = 't', long)]
    pub timeout: Option<f64>,

    /// Warning response time in seconds, fractions allowed [default: 10]
    #[arg(short = 'w', long)]
    pub warning: Option<f64>,

    /// Critical response time in seconds, fractions allowed [default: 15]
    #[arg(short = 'c', long)]
    pub critical: Option<f64>,

    /// Print long output (the full decoded response tree)
    #[arg(long)]
    pub verbose: bool,

    /// User-Agent header to send instead of the built-in one
    #[arg(short = 'A', long)]
    pub user_agent: Option<String>,

    /// TOML file with default settings; command-line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (logs go to stderr) [default: error]
    #[arg(short = 'l', long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Run in debug mode (debug logging unless --log-level is given)
    #[arg(short = 'd', long)]
    pub debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LogLevel {
    /// Equivalent tracing level name. `fatal` and `panic` collapse onto `error`.
    pub fn as_tracing(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => "error",
        }
    }
}

impl Cli {
    /// An explicit --log-level wins over --debug.
    pub fn effective_log_level(&self) -> LogLevel {
        match self.log_level {
            Some(level) => level,
            None if self.debug => LogLevel::Debug,
            None => LogLevel::Error,
        }
    }
}
