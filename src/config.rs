//! Configuration: built-in defaults, then an optional TOML file, then
//! command line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::{poller::PollIntervals, sort::Column};

const APP_DIR: &str = "nba-epa-tui";

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Live NBA player performance dashboard", long_about = None)]
pub struct Args {
    /// Base URL of the stats backend
    #[arg(short, long)]
    pub url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Full reload interval in seconds
    #[arg(long)]
    pub full_refresh: Option<u64>,

    /// Live games reload interval in seconds
    #[arg(long)]
    pub live_refresh: Option<u64>,

    /// Last-update timestamp reload interval in seconds
    #[arg(long)]
    pub last_update_refresh: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Initial sort column, e.g. custom_score, points, minutes
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Where to write the log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PollingConfig {
    #[serde(default = "default_full_secs")]
    pub full_secs: u64,

    #[serde(default = "default_live_secs")]
    pub live_secs: u64,

    #[serde(default = "default_last_update_secs")]
    pub last_update_secs: u64,
}

fn default_full_secs() -> u64 {
    300
}

fn default_live_secs() -> u64 {
    30
}

fn default_last_update_secs() -> u64 {
    60
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            full_secs: default_full_secs(),
            live_secs: default_live_secs(),
            last_update_secs: default_last_update_secs(),
        }
    }
}

impl PollingConfig {
    pub fn intervals(&self) -> PollIntervals {
        let secs = |s: u64| Duration::from_secs(s.max(1));
        PollIntervals {
            full: secs(self.full_secs),
            live: secs(self.live_secs),
            last_update: secs(self.last_update_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_sort() -> String {
    Column::CustomScore.key().to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { sort: default_sort() }
    }
}

impl DisplayConfig {
    pub fn sort_column(&self) -> Result<Column> {
        self.sort.parse::<Column>().map_err(anyhow::Error::msg)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join(APP_DIR).join("dashboard.log"))
        .unwrap_or_else(|| PathBuf::from("dashboard.log"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl Config {
    /// Resolves the final configuration for a run.
    pub fn load(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_args(args);
        config.display.sort_column()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(url) = &args.url {
            self.server.base_url = url.clone();
        }
        if let Some(t) = args.timeout {
            self.server.timeout_secs = t;
        }
        if let Some(s) = args.full_refresh {
            self.polling.full_secs = s;
        }
        if let Some(s) = args.live_refresh {
            self.polling.live_secs = s;
        }
        if let Some(s) = args.last_update_refresh {
            self.polling.last_update_secs = s;
        }
        if let Some(sort) = &args.sort {
            self.display.sort = sort.clone();
        }
        if let Some(file) = &args.log_file {
            self.logging.file = file.clone();
        }
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs.max(1))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
}
