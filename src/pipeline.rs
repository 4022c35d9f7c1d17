//! Pipeline driver.
//!
//! Runs fetch → extract → normalize → store for every listing page, then the
//! statistics and plot steps over the whole store.

use crate::analysis;
use crate::config::Config;
use crate::error::{Result, SalaryError};
use crate::models::{ChartSpec, ScrapeSummary, SourcePage, StepOutcome};
use crate::report::{self, ChartRenderer, SummaryFormat};
use crate::scrape::{process_page, PageFetcher, RowExtractor};
use crate::store::SalaryStore;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

/// Outcome of a full run, used to pick the exit code.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub scrape: Option<ScrapeSummary>,
    pub stats: Option<StepOutcome>,
    pub plot: Option<StepOutcome>,
}

impl RunReport {
    /// 0 when every step that ran completed, 3 when any was skipped or a
    /// page was dropped after a fetch failure.
    pub fn exit_code(&self) -> i32 {
        let pages_dropped = self.scrape.as_ref().is_some_and(|s| s.pages_failed > 0);
        let skipped = pages_dropped
            || [&self.stats, &self.plot]
                .into_iter()
                .flatten()
                .any(StepOutcome::is_skipped);

        if skipped {
            3
        } else {
            0
        }
    }
}

/// Fetch every configured page and append its salaries to `store`.
///
/// Pages are fetched up to `http.concurrency` at a time but handled strictly
/// in page order, so the store layout never depends on network timing. A fetch
/// failure aborts the remaining pages unless `http.continue_on_fetch_error`
/// is set; rows from earlier pages stay in the store either way.
pub async fn scrape_pages<F, E>(
    fetcher: &F,
    extractor: &E,
    config: &Config,
    store: &SalaryStore,
    show_progress: bool,
) -> Result<ScrapeSummary>
where
    F: PageFetcher,
    E: RowExtractor,
{
    let pages = SourcePage::enumerate(&config.source.base_url, config.source.page_count);
    let progress = progress_bar(pages.len(), show_progress);
    let mut summary = ScrapeSummary::default();

    let mut fetched = stream::iter(pages)
        .map(move |page| async move {
            let body = fetcher.fetch(&page.url).await;
            (page, body)
        })
        .buffered(config.http.concurrency.max(1));

    while let Some((page, body)) = fetched.next().await {
        progress.set_message(format!("page {}", page.number));

        let html = match body {
            Ok(html) => html,
            Err(e) if config.http.continue_on_fetch_error => {
                warn!("Skipping {}: {}", page, e);
                summary.pages_failed += 1;
                progress.inc(1);
                continue;
            }
            Err(e) => {
                progress.abandon();
                error!("Aborting scrape at {}: {}", page, e);
                return Err(e);
            }
        };
        summary.pages_fetched += 1;

        match process_page(extractor, &html) {
            Ok(page_salaries) => {
                summary.rows_extracted += page_salaries.rows.len();
                summary.rows_rejected += page_salaries.rejected;
                summary.records_appended += store.append(&page_salaries.records)?;
                info!(
                    "{}: {} salaries appended",
                    page,
                    page_salaries.records.len()
                );
            }
            Err(e @ SalaryError::TableNotFound { .. }) => {
                warn!("{}: {}", page, e);
                summary.pages_without_table += 1;
            }
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(summary)
}

/// Compute statistics over the store and write the summary.
///
/// Returns the written summary text on completion.
pub fn run_stats(config: &Config, format: SummaryFormat) -> Result<(StepOutcome, Option<String>)> {
    let store = SalaryStore::new(&config.storage.salary_file);

    let stats = match analysis::aggregate_store(&store, config.policy.stats_on_malformed) {
        Ok(stats) => stats,
        Err(e) if e.is_soft() => {
            warn!("Statistics skipped: {}", e);
            return Ok((StepOutcome::Skipped(e.to_string()), None));
        }
        Err(e) => return Err(e),
    };

    let content = report::write_summary(
        &stats,
        format,
        store.path(),
        &config.storage.stats_file,
    )?;
    info!(
        "Wrote statistics for {} salaries to {}",
        stats.count,
        config.storage.stats_file.display()
    );

    Ok((StepOutcome::Completed, Some(content)))
}

/// Render the distribution plot from the store.
pub fn run_plot<R: ChartRenderer>(config: &Config, renderer: &R) -> Result<StepOutcome> {
    let store = SalaryStore::new(&config.storage.salary_file);

    match report::visualize(
        &store,
        config.policy.plot_on_malformed,
        renderer,
        &ChartSpec::default(),
        &config.storage.plot_file,
    ) {
        Ok(_) => Ok(StepOutcome::Completed),
        Err(e) if e.is_soft() => {
            warn!("Plot skipped: {}", e);
            Ok(StepOutcome::Skipped(e.to_string()))
        }
        Err(e) => Err(e),
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
