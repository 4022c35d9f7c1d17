//! Salary table extraction.
//!
//! Pulls `(player, salary)` rows out of a listing page. The default strategy
//! is positional: it reads fixed cell indices, so any change to the listing's
//! column layout silently shifts what gets read. Swap in another
//! [`RowExtractor`] if the site changes shape.

use crate::analysis::normalizer::strip_currency;
use crate::error::{Result, SalaryError};
use crate::models::ExtractedRow;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Column holding the player name.
const NAME_CELL: usize = 1;
/// Column holding the salary.
const SALARY_CELL: usize = 3;
/// Header text that reappears mid-table on paginated listings.
const HEADER_REPEAT: &str = "SALARY";

/// Strategy for pulling salary rows out of a parsed page.
pub trait RowExtractor {
    fn extract_rows(&self, document: &Html) -> Result<Vec<ExtractedRow>>;
}

/// Positional extractor for the listing's salary table.
///
/// Reads cell 1 as the player and cell 3 as the salary, so a column
/// reorder on the site changes what is read without any error. Only the
/// first `<tr>` of the whole table is dropped as the header, even when the
/// table splits rows across `<thead>` and `<tbody>`; a `<tbody>` whose first
/// row is data keeps that row. Repeated header rows are caught by their
/// "SALARY" cell instead.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    marker: String,
}

impl TableExtractor {
    /// `marker` is matched as a substring of the table's `class` attribute.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    fn find_table<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let tables = selector("table");
        document.select(&tables).find(|table| {
            table
                .value()
                .attr("class")
                .is_some_and(|class| class.contains(&self.marker))
        })
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new("tablehead")
    }
}

impl RowExtractor for TableExtractor {
    fn extract_rows(&self, document: &Html) -> Result<Vec<ExtractedRow>> {
        let table = self.find_table(document).ok_or_else(|| SalaryError::TableNotFound {
            marker: self.marker.clone(),
        })?;

        let row_sel = selector("tr");
        let cell_sel = selector("td");
        let mut extracted = Vec::new();

        // First row is the header.
        for row in table.select(&row_sel).skip(1) {
            let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
            if cells.len() <= SALARY_CELL {
                continue;
            }

            let player = cell_text(&cells[NAME_CELL]);
            let raw_salary = cell_text(&cells[SALARY_CELL]);
            if raw_salary == HEADER_REPEAT {
                continue;
            }

            let salary_text = strip_currency(&raw_salary);
            debug!("Player: {}, Salary: {}", player, salary_text);

            extracted.push(ExtractedRow {
                player,
                salary_text,
            });
        }

        Ok(extracted)
    }
}

/// Parse raw markup and extract rows with `extractor`.
pub fn extract_from_html<E: RowExtractor + ?Sized>(
    extractor: &E,
    html: &str,
) -> Result<Vec<ExtractedRow>> {
    let document = Html::parse_document(html);
    extractor.extract_rows(&document)
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("fixed tag selector")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<table class="other"><tr><td>x</td><td>ignored</td><td>x</td><td>$1</td></tr></table>
<table cellspacing="1" class="tablehead">
  <tr class="stathead"><td colspan="4">ESPN NBA Salaries</td></tr>
  <tr class="colhead"><td>RK</td><td>NAME</td><td>TEAM</td><td>SALARY</td></tr>
  <tr class="oddrow"><td>1</td><td><a href="/p/1">Stephen Curry</a>, PG</td><td>Golden State Warriors</td><td>$55,761,216</td></tr>
  <tr class="evenrow"><td>2</td><td> Joel Embiid, C </td><td>Philadelphia 76ers</td><td>$51,415,938</td></tr>
  <tr class="colhead"><td>RK</td><td>NAME</td><td>TEAM</td><td>SALARY</td></tr>
  <tr><td colspan="3">Footer</td></tr>
  <tr class="oddrow"><td>3</td><td>Nikola Jokic, C</td><td>Denver Nuggets</td><td>$51,415,938</td></tr>
</table>
</body></html>
"#;

    #[test]
    fn test_extracts_rows_in_order() {
        let rows = extract_from_html(&TableExtractor::default(), PAGE).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].player, "Stephen Curry, PG");
        assert_eq!(rows[0].salary_text, "55761216");
        assert_eq!(rows[1].player, "Joel Embiid, C");
        assert_eq!(rows[2].salary_text, "51415938");
    }

    #[test]
    fn test_skips_header_repeats_and_short_rows() {
        let rows = extract_from_html(&TableExtractor::default(), PAGE).unwrap();

        assert!(rows.iter().all(|r| r.salary_text != "SALARY"));
        assert!(rows.iter().all(|r| r.player != "Footer"));
    }

    #[test]
    fn test_first_row_is_skipped_even_with_data() {
        let html = r#"<table class="tablehead">
            <tr><td>1</td><td>First Row</td><td>T</td><td>$10</td></tr>
            <tr><td>2</td><td>Second Row</td><td>T</td><td>$20</td></tr>
        </table>"#;

        let rows = extract_from_html(&TableExtractor::default(), html).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player, "Second Row");
    }

    #[test]
    fn test_only_first_table_row_is_skipped_across_sections() {
        let html = r#"<table class="tablehead">
            <thead><tr><td>RK</td><td>NAME</td><td>TEAM</td><td>PAY</td></tr></thead>
            <tbody>
              <tr><td>1</td><td>Body First</td><td>T</td><td>$10</td></tr>
              <tr><td>2</td><td>Body Second</td><td>T</td><td>$20</td></tr>
            </tbody>
        </table>"#;

        let rows = extract_from_html(&TableExtractor::default(), html).unwrap();
        let players: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["Body First", "Body Second"]);
    }

    #[test]
    fn test_marker_matches_class_substring() {
        let html = r#"<table class="mod-data tablehead-v2">
            <tr><td>h</td></tr>
            <tr><td>1</td><td>Player</td><td>T</td><td>$1,000</td></tr>
        </table>"#;

        let rows = extract_from_html(&TableExtractor::default(), html).unwrap();
        assert_eq!(rows[0].salary_text, "1000");
    }

    #[test]
    fn test_table_not_found() {
        let err = extract_from_html(&TableExtractor::default(), "<html><p>maintenance</p></html>")
            .unwrap_err();
        assert!(matches!(err, SalaryError::TableNotFound { .. }));
        assert!(err.is_soft());
    }

    #[test]
    fn test_custom_marker() {
        let html = r#"<table class="salaries">
            <tr><td>h</td></tr>
            <tr><td>1</td><td>P</td><td>T</td><td>$5</td></tr>
        </table>"#;

        assert!(extract_from_html(&TableExtractor::default(), html).is_err());
        let rows = extract_from_html(&TableExtractor::new("salaries"), html).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_non_numeric_salary_is_passed_through() {
        let html = r#"<table class="tablehead">
            <tr><td>h</td></tr>
            <tr><td>1</td><td>P</td><td>T</td><td>N/A</td></tr>
        </table>"#;

        let rows = extract_from_html(&TableExtractor::default(), html).unwrap();
        assert_eq!(rows[0].salary_text, "N/A");
    }
}
