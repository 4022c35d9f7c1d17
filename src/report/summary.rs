//! Statistics summary generation.
//!
//! Renders [`SalaryStatistics`] as the five-line currency block or as JSON,
//! and writes it over any previous summary.

use crate::error::Result;
use crate::models::{SalaryStatistics, StatisticsReport};
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;
use std::path::Path;

/// Output format for the statistics summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SummaryFormat {
    /// Five labeled currency lines (default)
    #[default]
    Text,
    /// JSON document with a timestamp
    Json,
}

/// Format an amount as US currency: `$1,234,567.89`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());

    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}.{}", grouped, frac_part)
    } else {
        format!("${}.{}", grouped, frac_part)
    }
}

/// Generate the plain-text summary block.
pub fn generate_text_summary(stats: &SalaryStatistics) -> String {
    let mut output = String::new();

    output.push_str(&format!("Maximum Salary: {}\n", format_currency(stats.max)));
    output.push_str(&format!("Minimum Salary: {}\n", format_currency(stats.min)));
    output.push_str(&format!("Average Salary: {}\n", format_currency(stats.mean)));
    output.push_str(&format!("Total Salary: {}\n", format_currency(stats.sum)));
    output.push_str(&format!("Median Salary: {}\n", format_currency(stats.median)));

    output
}

/// Generate a JSON summary.
pub fn generate_json_summary(stats: &SalaryStatistics, source_file: &Path) -> Result<String> {
    let report = StatisticsReport {
        generated_at: Utc::now(),
        source_file: source_file.display().to_string(),
        statistics: stats.clone(),
    };

    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Write the summary, replacing any previous file.
pub fn write_summary(
    stats: &SalaryStatistics,
    format: SummaryFormat,
    source_file: &Path,
    path: &Path,
) -> Result<String> {
    let content = match format {
        SummaryFormat::Text => generate_text_summary(stats),
        SummaryFormat::Json => generate_json_summary(stats, source_file)?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(content)
}
