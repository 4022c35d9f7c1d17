//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::MalformedPolicy;
use crate::report::SummaryFormat;
use clap::Parser;
use std::path::PathBuf;

/// nba-salaries - scrape NBA salaries, summarize and plot them
///
/// Downloads every page of the salary listing, appends the salaries to a
/// plain-text store, writes max/min/average/total/median to a summary file
/// and renders the sorted distribution to a PNG.
///
/// The store is append-only: running twice without --reset-store counts
/// every player twice.
///
/// Examples:
///   nba-salaries
///   nba-salaries --reset-store --concurrency 4
///   nba-salaries --skip-scrape --stats-format json
///   nba-salaries --dry-run --pages 3
///   nba-salaries --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .nba-salaries.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// URL of the first listing page
    #[arg(long, value_name = "URL", env = "NBA_SALARIES_URL")]
    pub base_url: Option<String>,

    /// Number of listing pages to fetch, including the first
    #[arg(long, value_name = "COUNT")]
    pub pages: Option<usize>,

    /// Salary store file (appended to)
    #[arg(long, value_name = "FILE", env = "NBA_SALARIES_STORE")]
    pub store: Option<PathBuf>,

    /// Statistics summary file (overwritten)
    #[arg(long, value_name = "FILE")]
    pub stats_output: Option<PathBuf>,

    /// Plot image file (overwritten)
    #[arg(long, value_name = "FILE")]
    pub plot_output: Option<PathBuf>,

    /// Statistics summary format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub stats_format: SummaryFormat,

    /// Clear the salary store before scraping
    #[arg(long, conflicts_with = "skip_scrape")]
    pub reset_store: bool,

    /// Do not fetch anything; summarize and plot the existing store
    #[arg(long)]
    pub skip_scrape: bool,

    /// Do not render the plot
    #[arg(long)]
    pub no_plot: bool,

    /// Pages fetched at once (rows are still stored in page order)
    #[arg(long, value_name = "NUM")]
    pub concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip pages that fail to download instead of aborting the run
    #[arg(long)]
    pub continue_on_error: bool,

    /// What statistics do with unparsable stored lines (skip, abort)
    #[arg(long, value_name = "POLICY")]
    pub stats_on_malformed: Option<MalformedPolicy>,

    /// What the plot does with unparsable stored lines (skip, abort)
    #[arg(long, value_name = "POLICY")]
    pub plot_on_malformed: Option<MalformedPolicy>,

    /// List the pages that would be fetched and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .nba-salaries.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.pages == Some(0) && !self.skip_scrape {
            return Err("Pages must be at least 1".to_string());
        }

        if self.concurrency == Some(0) {
            return Err("Concurrency must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args::try_parse_from(["nba-salaries"]).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = make_args();
        assert_eq!(args.stats_format, SummaryFormat::Text);
        assert!(!args.reset_store);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "nba-salaries",
            "--pages",
            "3",
            "--concurrency",
            "4",
            "--stats-format",
            "json",
            "--plot-on-malformed",
            "skip",
            "--reset-store",
        ])
        .unwrap();

        assert_eq!(args.pages, Some(3));
        assert_eq!(args.concurrency, Some(4));
        assert_eq!(args.stats_format, SummaryFormat::Json);
        assert_eq!(args.plot_on_malformed, Some(MalformedPolicy::Skip));
        assert!(args.reset_store);
    }

    #[test]
    fn test_reset_conflicts_with_skip_scrape() {
        assert!(Args::try_parse_from(["nba-salaries", "--reset-store", "--skip-scrape"]).is_err());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.base_url = Some("www.espn.com".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.concurrency = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.pages = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
