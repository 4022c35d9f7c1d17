//! Scraping: page retrieval and salary table extraction.

pub mod extractor;
pub mod fetcher;

pub use extractor::{extract_from_html, RowExtractor, TableExtractor};
pub use fetcher::{HttpFetcher, PageFetcher};

use crate::analysis::normalizer::{parse_salary, NumberStyle};
use crate::error::Result;
use crate::models::{ExtractedRow, SalaryRecord};
use tracing::warn;

/// Salaries pulled from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSalaries {
    pub rows: Vec<ExtractedRow>,
    pub records: Vec<SalaryRecord>,
    /// Rows whose salary text did not normalize.
    pub rejected: usize,
}

/// Extract rows from `html` and normalize their salaries.
///
/// Rows that do not normalize are dropped with a warning; the store only
/// ever receives decimals.
pub fn process_page<E: RowExtractor + ?Sized>(extractor: &E, html: &str) -> Result<PageSalaries> {
    let rows = extract_from_html(extractor, html)?;

    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = 0;

    for row in &rows {
        match parse_salary(&row.salary_text, NumberStyle::Strict) {
            Some(value) => records.push(value),
            None => {
                warn!(
                    "Skipping {}: salary '{}' is not a number",
                    row.player, row.salary_text
                );
                rejected += 1;
            }
        }
    }

    Ok(PageSalaries {
        rows,
        records,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_process_page_normalizes() {
        let html = r#"<table class="tablehead">
            <tr><td>RK</td><td>NAME</td><td>TEAM</td><td>SALARY</td></tr>
            <tr><td>1</td><td>A</td><td>T</td><td>$1,234,567</td></tr>
            <tr><td>2</td><td>B</td><td>T</td><td>--</td></tr>
            <tr><td>3</td><td>C</td><td>T</td><td>$900,000</td></tr>
        </table>"#;

        let page = process_page(&TableExtractor::default(), html).unwrap();

        assert_eq!(page.rows.len(), 3);
        assert_eq!(
            page.records,
            vec![Decimal::from(1_234_567), Decimal::from(900_000)]
        );
        assert_eq!(page.rejected, 1);
    }
}
