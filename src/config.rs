//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.nba-salaries.toml` files.

use crate::analysis::MalformedPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".nba-salaries.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listing to scrape.
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Output file locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Handling of malformed stored salaries.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Salary listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the first page. Later pages append `/_/page/{n}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of pages to fetch, including the first.
    #[serde(default = "default_page_count")]
    pub page_count: usize,

    /// Substring of the salary table's class attribute.
    #[serde(default = "default_table_marker")]
    pub table_marker: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_count: default_page_count(),
            table_marker: default_table_marker(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.espn.com/nba/salaries".to_string()
}

fn default_page_count() -> usize {
    12
}

fn default_table_marker() -> String {
    "tablehead".to_string()
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pages fetched at once. Rows are always stored in page order.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Keep going after a page fails to download.
    #[serde(default)]
    pub continue_on_fetch_error: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            concurrency: default_concurrency(),
            continue_on_fetch_error: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("nba-salaries/{}", env!("CARGO_PKG_VERSION"))
}

fn default_concurrency() -> usize {
    1
}

/// Output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Append-only salary store.
    #[serde(default = "default_salary_file")]
    pub salary_file: PathBuf,

    /// Statistics summary, overwritten each run.
    #[serde(default = "default_stats_file")]
    pub stats_file: PathBuf,

    /// Distribution plot, overwritten each run.
    #[serde(default = "default_plot_file")]
    pub plot_file: PathBuf,

    /// Clear the store before scraping. Off by default, so the store
    /// accumulates every run's rows.
    #[serde(default)]
    pub reset_store: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            salary_file: default_salary_file(),
            stats_file: default_stats_file(),
            plot_file: default_plot_file(),
            reset_store: false,
        }
    }
}

fn default_salary_file() -> PathBuf {
    PathBuf::from("salaries.txt")
}

fn default_stats_file() -> PathBuf {
    PathBuf::from("salaryStats.txt")
}

fn default_plot_file() -> PathBuf {
    PathBuf::from("salaryScatterPlot.png")
}

/// Malformed-line handling per consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Statistics drop bad lines by default.
    #[serde(default = "default_stats_policy")]
    pub stats_on_malformed: MalformedPolicy,

    /// The plot fails on the first bad line by default.
    #[serde(default = "default_plot_policy")]
    pub plot_on_malformed: MalformedPolicy,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            stats_on_malformed: default_stats_policy(),
            plot_on_malformed: default_plot_policy(),
        }
    }
}

fn default_stats_policy() -> MalformedPolicy {
    MalformedPolicy::Skip
}

fn default_plot_policy() -> MalformedPolicy {
    MalformedPolicy::Abort
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only arguments that were actually given override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.base_url {
            self.source.base_url = url.clone();
        }
        if let Some(pages) = args.pages {
            self.source.page_count = pages;
        }

        if let Some(timeout) = args.timeout {
            self.http.timeout_seconds = timeout;
        }
        if let Some(concurrency) = args.concurrency {
            self.http.concurrency = concurrency;
        }
        if args.continue_on_error {
            self.http.continue_on_fetch_error = true;
        }

        if let Some(ref store) = args.store {
            self.storage.salary_file = store.clone();
        }
        if let Some(ref stats) = args.stats_output {
            self.storage.stats_file = stats.clone();
        }
        if let Some(ref plot) = args.plot_output {
            self.storage.plot_file = plot.clone();
        }
        if args.reset_store {
            self.storage.reset_store = true;
        }

        if let Some(policy) = args.stats_on_malformed {
            self.policy.stats_on_malformed = policy;
        }
        if let Some(policy) = args.plot_on_malformed {
            self.policy.plot_on_malformed = policy;
        }
    }

    /// Check values that would make the run meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.source.base_url.starts_with("http://")
            && !self.source.base_url.starts_with("https://")
        {
            anyhow::bail!("Base URL must start with 'http://' or 'https://'");
        }
        if self.source.table_marker.trim().is_empty() {
            anyhow::bail!("Table marker must not be empty");
        }
        if self.http.concurrency == 0 {
            anyhow::bail!("Concurrency must be at least 1");
        }
        if self.http.timeout_seconds == 0 {
            anyhow::bail!("Timeout must be at least 1 second");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
