//! Data models for the salary pipeline.
//!
//! This module contains the core data structures passed between the
//! scraping, storage, statistics and plotting stages.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single player's salary, as persisted in the store.
///
/// Duplicates are meaningful: every row of the listing is one player.
pub type SalaryRecord = Decimal;

/// One page of the paginated salary listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePage {
    /// 1-based page number.
    pub number: usize,
    /// Absolute URL of the page.
    pub url: String,
}

impl SourcePage {
    /// Enumerate the pages of a listing.
    ///
    /// The first page lives at the bare base URL; pages 2..=`page_count`
    /// live at `{base_url}/_/page/{n}`.
    pub fn enumerate(base_url: &str, page_count: usize) -> Vec<SourcePage> {
        let base = base_url.trim_end_matches('/');

        (1..=page_count)
            .map(|number| {
                let url = if number == 1 {
                    base.to_string()
                } else {
                    format!("{}/_/page/{}", base, number)
                };
                SourcePage { number, url }
            })
            .collect()
    }
}

impl fmt::Display for SourcePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} ({})", self.number, self.url)
    }
}

/// A row pulled out of the salary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRow {
    /// Player name, trimmed.
    pub player: String,
    /// Salary text with `$` and `,` already stripped.
    pub salary_text: String,
}

/// Descriptive statistics over the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryStatistics {
    /// Number of records that contributed.
    pub count: usize,
    pub max: Decimal,
    pub min: Decimal,
    pub mean: Decimal,
    pub sum: Decimal,
    pub median: Decimal,
}

/// JSON form of the statistics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub generated_at: DateTime<Utc>,
    pub source_file: String,
    pub statistics: SalaryStatistics,
}

/// A single plotted point: post-sort rank against salary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub index: usize,
    pub value: Decimal,
}

impl PlotPoint {
    /// Coordinates as floats for the renderer.
    pub fn coords(&self) -> (f64, f64) {
        (self.index as f64, self.value.to_f64().unwrap_or(0.0))
    }
}

/// Sorted salaries indexed by rank. The X axis carries no player identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotSeries {
    pub points: Vec<PlotPoint>,
}

impl PlotSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Smallest and largest salary in the series, as floats.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.coords().1;
        let last = self.points.last()?.coords().1;
        Some((first, last))
    }
}

/// Chart title and axis labels handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            title: "NBA Salary Scatter Plot".to_string(),
            x_label: "Player Index".to_string(),
            y_label: "Salary ($)".to_string(),
            width: 600,
            height: 400,
        }
    }
}

/// How a pipeline step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and wrote its output.
    Completed,
    /// The step was a soft no-op; the reason is user-facing.
    Skipped(String),
}

impl StepOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped(_))
    }
}

/// Totals reported after the scrape stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub pages_fetched: usize,
    pub pages_without_table: usize,
    pub pages_failed: usize,
    pub rows_extracted: usize,
    pub rows_rejected: usize,
    pub records_appended: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_pages() {
        let pages = SourcePage::enumerate("https://www.espn.com/nba/salaries", 12);

        assert_eq!(pages.len(), 12);
        assert_eq!(pages[0].url, "https://www.espn.com/nba/salaries");
        assert_eq!(pages[1].url, "https://www.espn.com/nba/salaries/_/page/2");
        assert_eq!(pages[11].url, "https://www.espn.com/nba/salaries/_/page/12");
        assert_eq!(pages[11].number, 12);
    }

    #[test]
    fn test_enumerate_trims_trailing_slash() {
        let pages = SourcePage::enumerate("http://example.test/list/", 2);
        assert_eq!(pages[0].url, "http://example.test/list");
        assert_eq!(pages[1].url, "http://example.test/list/_/page/2");
    }

    #[test]
    fn test_enumerate_zero_pages() {
        assert!(SourcePage::enumerate("http://example.test", 0).is_empty());
    }

    #[test]
    fn test_default_chart_spec() {
        let spec = ChartSpec::default();
        assert_eq!(spec.x_label, "Player Index");
        assert_eq!(spec.y_label, "Salary ($)");
        assert_eq!((spec.width, spec.height), (600, 400));
    }
}
