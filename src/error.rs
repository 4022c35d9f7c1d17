//! Error types for the salary pipeline.
//!
//! Soft errors end a step without output and without failing the run;
//! everything else is a hard failure.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SalaryError {
    #[error("Failed to fetch {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Salary table not found (no table with class containing '{marker}')")]
    TableNotFound { marker: String },

    #[error("Unparsable salary on line {line}: '{text}'")]
    Parse { line: usize, text: String },

    #[error("Not enough data: {0}")]
    EmptyDataset(String),

    #[error("Salary store not found: {}", .0.display())]
    MissingStore(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to render chart: {0}")]
    Render(String),

    #[error("Decimal overflow computing {0}")]
    Overflow(String),
}

impl SalaryError {
    /// Whether the error should only skip the current step.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            SalaryError::TableNotFound { .. }
                | SalaryError::EmptyDataset(_)
                | SalaryError::MissingStore(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SalaryError>;
