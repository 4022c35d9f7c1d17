//! Salary analysis: text normalization and statistics.

pub mod normalizer;
pub mod stats;

pub use normalizer::MalformedPolicy;
pub use stats::aggregate_store;
