use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::cli::Cli;
use crate::evaluate::Thresholds;
use crate::fetch::FetchOptions;

pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
pub const DEFAULT_WARNING_SECS: f64 = 10.0;
pub const DEFAULT_CRITICAL_SECS: f64 = 15.0;

/// Everything a single check run needs.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub url: String,
    /// Run deadline; also used as the HTTP client's own request timeout.
    pub timeout: Duration,
    pub thresholds: Thresholds,
    pub verbose: bool,
    pub user_agent: Option<String>,
    /// Off unless a caller builds the config by hand.
    pub verify_tls: bool,
}

/// Optional settings from a TOML file, all under a `[check]` table.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub check: CheckSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckSection {
    pub url: Option<String>,
    pub timeout: Option<f64>,
    pub warning: Option<f64>,
    pub critical: Option<f64>,
    pub user_agent: Option<String>,
    pub verbose: Option<bool>,
}

/// Load default settings from a TOML file.
pub fn load_config(path: &Path) -> anyhow::Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

impl CheckConfig {
    /// Layer built-in defaults, the optional config file, and command-line flags.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => load_config(path)?.check,
            None => CheckSection::default(),
        };

        let url = cli
            .url
            .clone()
            .or(file.url)
            .filter(|u| !u.is_empty())
            .context("No URL to check, pass --url")?;

        let timeout_secs = cli.timeout.or(file.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = Duration::try_from_secs_f64(timeout_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .with_context(|| format!("Invalid timeout: {timeout_secs} (must be a positive number of seconds)"))?;

        Ok(Self {
            url,
            timeout,
            thresholds: Thresholds {
                warning: cli.warning.or(file.warning).unwrap_or(DEFAULT_WARNING_SECS),
                critical: cli.critical.or(file.critical).unwrap_or(DEFAULT_CRITICAL_SECS),
            },
            verbose: cli.verbose || file.verbose.unwrap_or(false),
            user_agent: cli.user_agent.clone().or(file.user_agent),
            verify_tls: false,
        })
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            url: self.url.clone(),
            verify_tls: self.verify_tls,
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}
