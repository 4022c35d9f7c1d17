//! Salary statistics.
//!
//! Computes max, min, mean, sum and median over the store using exact
//! decimal arithmetic.

use crate::analysis::normalizer::{parse_lines, MalformedPolicy, NumberStyle};
use crate::error::{Result, SalaryError};
use crate::models::{SalaryRecord, SalaryStatistics};
use crate::store::SalaryStore;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Compute statistics over the positive values in `records`.
pub fn compute(records: &[SalaryRecord]) -> Result<SalaryStatistics> {
    let mut valid: Vec<Decimal> = records
        .iter()
        .copied()
        .filter(|v| *v > Decimal::ZERO)
        .collect();

    if valid.is_empty() {
        return Err(SalaryError::EmptyDataset("no valid salary data found".to_string()));
    }

    valid.sort();

    let count = valid.len();
    let sum = valid.iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(*v)
            .ok_or_else(|| SalaryError::Overflow("salary total".to_string()))
    })?;
    let mean = sum
        .checked_div(Decimal::from(count))
        .ok_or_else(|| SalaryError::Overflow("salary mean".to_string()))?;

    let stats = SalaryStatistics {
        count,
        max: valid[count - 1],
        min: valid[0],
        mean,
        sum,
        median: median_of_sorted(&valid)?,
    };

    debug!("Computed statistics over {} salaries", count);
    Ok(stats)
}

/// Median of an ascending slice. Even counts average the two middle values.
fn median_of_sorted(sorted: &[Decimal]) -> Result<Decimal> {
    let n = sorted.len();
    if n == 0 {
        return Err(SalaryError::EmptyDataset("no valid salary data found".to_string()));
    }

    let half = n / 2;
    if n % 2 == 1 {
        return Ok(sorted[half]);
    }

    sorted[half]
        .checked_add(sorted[half - 1])
        .and_then(|pair| pair.checked_div(Decimal::TWO))
        .ok_or_else(|| SalaryError::Overflow("salary median".to_string()))
}

/// Read the store and compute statistics, parsing lines leniently.
pub fn aggregate_store(store: &SalaryStore, policy: MalformedPolicy) -> Result<SalaryStatistics> {
    let lines = store.read_all()?;
    info!(
        "Read {} line(s) from {}",
        lines.len(),
        store.path().display()
    );

    let records = parse_lines(&lines, NumberStyle::Lenient, policy)?;
    compute(&records)
}
