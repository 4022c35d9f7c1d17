//! Salary text normalization.
//!
//! Turns scraped or stored salary text into exact decimal amounts using
//! locale-invariant rules: `.` is the only decimal point, no sign, no exponent.

use crate::error::{Result, SalaryError};
use crate::models::SalaryRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// Accepted number syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// Decimal point plus `,` thousands separators in the integer part.
    Lenient,
    /// Decimal point only.
    Strict,
}

/// What a call site does with a value it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Drop the value and keep going.
    Skip,
    /// Fail the whole step.
    Abort,
}

/// Remove currency symbols and thousands separators from scraped text.
pub fn strip_currency(raw: &str) -> String {
    raw.replace([',', '$'], "")
}

/// Parse a single salary. The caller trims the input.
pub fn parse_salary(text: &str, style: NumberStyle) -> Option<SalaryRecord> {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };

    let int_digits = match style {
        NumberStyle::Lenient => {
            if int_part.starts_with(',') {
                return None;
            }
            int_part.replace(',', "")
        }
        NumberStyle::Strict => int_part.to_string(),
    };

    let frac_digits = frac_part.unwrap_or("");

    if !int_digits.chars().all(|c| c.is_ascii_digit())
        || !frac_digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let int_digits = if int_digits.is_empty() {
        "0"
    } else {
        int_digits.as_str()
    };
    let canonical = if frac_digits.is_empty() {
        int_digits.to_string()
    } else {
        format!("{}.{}", int_digits, frac_digits)
    };

    Decimal::from_str(&canonical).ok()
}

/// Parse stored lines, applying `policy` to anything unparsable.
///
/// Lines are trimmed first. With [`MalformedPolicy::Abort`] the first bad line
/// fails with its 1-based line number.
pub fn parse_lines<S: AsRef<str>>(
    lines: &[S],
    style: NumberStyle,
    policy: MalformedPolicy,
) -> Result<Vec<SalaryRecord>> {
    let mut values = Vec::with_capacity(lines.len());
    let mut dropped = 0usize;

    for (idx, line) in lines.iter().enumerate() {
        let text = line.as_ref().trim();
        match parse_salary(text, style) {
            Some(value) => values.push(value),
            None => match policy {
                MalformedPolicy::Skip => {
                    debug!("Skipping unparsable salary on line {}: '{}'", idx + 1, text);
                    dropped += 1;
                }
                MalformedPolicy::Abort => {
                    return Err(SalaryError::Parse {
                        line: idx + 1,
                        text: text.to_string(),
                    });
                }
            },
        }
    }

    if dropped > 0 {
        warn!("Dropped {} unparsable salary line(s)", dropped);
    }

    Ok(values)
}
