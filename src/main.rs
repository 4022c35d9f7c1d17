//! nba-salaries - NBA salary scraper and summarizer
//!
//! Scrapes the paginated salary listing, appends every salary to a
//! plain-text store, then writes summary statistics and a sorted
//! distribution plot.
//!
//! Exit codes:
//!   0 - Success (every step completed)
//!   1 - Runtime error (network, IO, unparsable store line, render, config)
//!   3 - Finished, but statistics or plot were skipped (no data) or
//!       pages were dropped with --continue-on-error

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod pipeline;
mod report;
mod scrape;
mod store;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use models::{SourcePage, StepOutcome};
use pipeline::RunReport;
use report::PlottersRenderer;
use scrape::{HttpFetcher, TableExtractor};
use std::time::Instant;
use store::SalaryStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("nba-salaries v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .nba-salaries.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   Edit it to change the listing URL, page count, and output files.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the pipeline. Returns the exit code (0 or 3).
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    if args.dry_run {
        return Ok(handle_dry_run(&config));
    }

    let mut run_report = RunReport::default();
    let store = SalaryStore::new(&config.storage.salary_file);

    // Step 1: scrape every page into the store
    if args.skip_scrape {
        info!("Skipping scrape, using existing store {}", store.path().display());
    } else {
        if config.storage.reset_store {
            store.reset().context("Failed to clear salary store")?;
        } else if store.exists() {
            warn!(
                "Appending to existing store {}; statistics will include earlier runs",
                store.path().display()
            );
        }

        println!(
            "📥 Fetching {} page(s) from {}",
            config.source.page_count, config.source.base_url
        );

        let fetcher = HttpFetcher::new(&config.http).context("Failed to create HTTP client")?;
        let extractor = TableExtractor::new(config.source.table_marker.clone());

        let summary =
            pipeline::scrape_pages(&fetcher, &extractor, &config, &store, !args.quiet).await?;

        println!(
            "   Pages: {} fetched, {} without table, {} failed",
            summary.pages_fetched, summary.pages_without_table, summary.pages_failed
        );
        println!(
            "   Salaries: {} of {} rows appended ({} rejected) to {}",
            summary.records_appended,
            summary.rows_extracted,
            summary.rows_rejected,
            store.path().display()
        );
        run_report.scrape = Some(summary);
    }

    // Step 2: statistics
    println!("\n📊 Computing salary statistics...");
    let (stats_outcome, content) = pipeline::run_stats(&config, args.stats_format)?;
    match (&stats_outcome, content) {
        (StepOutcome::Completed, Some(text)) => {
            println!("{}", text.trim_end());
            println!("   Saved to: {}", config.storage.stats_file.display());
        }
        (StepOutcome::Skipped(reason), _) => println!("   ⚠️  Skipped: {}", reason),
        _ => {}
    }
    run_report.stats = Some(stats_outcome);

    // Step 3: plot
    if args.no_plot {
        debug!("Plot disabled by --no-plot");
    } else {
        println!("\n📈 Rendering salary distribution...");
        let plot_outcome = pipeline::run_plot(&config, &PlottersRenderer)?;
        match &plot_outcome {
            StepOutcome::Completed => {
                println!("   Saved to: {}", config.storage.plot_file.display())
            }
            StepOutcome::Skipped(reason) => println!("   ⚠️  Skipped: {}", reason),
        }
        run_report.plot = Some(plot_outcome);
    }

    let exit_code = run_report.exit_code();
    println!(
        "\n✅ Done in {:.1}s{}",
        start_time.elapsed().as_secs_f64(),
        if exit_code == 0 {
            ""
        } else {
            " (some steps were skipped)"
        }
    );

    Ok(exit_code)
}

/// Handle --dry-run: list the pages that would be fetched.
fn handle_dry_run(config: &Config) -> i32 {
    println!("\n🔍 Dry run: no pages will be fetched.\n");

    for page in SourcePage::enumerate(&config.source.base_url, config.source.page_count) {
        println!("     📄 {}", page);
    }

    println!("\n   Store: {}", config.storage.salary_file.display());
    println!("   Stats: {}", config.storage.stats_file.display());
    println!("   Plot:  {}", config.storage.plot_file.display());
    0
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
