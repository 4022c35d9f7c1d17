//! Line-oriented salary store.
//!
//! One plain decimal per line, no header, appended across runs. There is no
//! locking: a single process writes at a time.

use crate::error::{Result, SalaryError};
use crate::models::SalaryRecord;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Append-only text file of salary records.
#[derive(Debug, Clone)]
pub struct SalaryStore {
    path: PathBuf,
}

impl SalaryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Append `values`, one per line, creating the file if needed.
    ///
    /// Never deduplicates. Returns the number of lines written.
    pub fn append(&self, values: &[SalaryRecord]) -> Result<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        for value in values {
            writeln!(writer, "{}", value)?;
        }
        writer.flush()?;

        debug!("Appended {} salaries to {}", values.len(), self.path.display());
        Ok(values.len())
    }

    /// Read every line of the store.
    pub fn read_all(&self) -> Result<Vec<String>> {
        if !self.exists() {
            return Err(SalaryError::MissingStore(self.path.clone()));
        }

        let reader = BufReader::new(fs::File::open(&self.path)?);
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Ok(lines)
    }

    /// Delete the store so the next run starts empty.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared salary store {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn decimals(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    #[test]
    fn test_append_and_read() {
        let dir = TempDir::new().unwrap();
        let store = SalaryStore::new(dir.path().join("salaries.txt"));

        let written = store.append(&decimals(&[500_000, 1_000_000])).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "500000\n1000000\n");
        assert_eq!(store.read_all().unwrap(), vec!["500000", "1000000"]);
    }

    #[test]
    fn test_append_twice_keeps_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = SalaryStore::new(dir.path().join("salaries.txt"));

        store.append(&decimals(&[100, 200])).unwrap();
        store.append(&decimals(&[100, 200])).unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["100", "200", "100", "200"]);
    }

    #[test]
    fn test_append_preserves_fraction() {
        let dir = TempDir::new().unwrap();
        let store = SalaryStore::new(dir.path().join("salaries.txt"));

        store.append(&[Decimal::new(150050, 2)]).unwrap();
        assert_eq!(store.read_all().unwrap(), vec!["1500.50"]);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = SalaryStore::new(dir.path().join("data/nested/salaries.txt"));

        store.append(&decimals(&[1])).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_read_missing_store() {
        let dir = TempDir::new().unwrap();
        let store = SalaryStore::new(dir.path().join("salaries.txt"));

        assert!(matches!(store.read_all(), Err(SalaryError::MissingStore(_))));
    }

    #[test]
    fn test_reset() {
        let dir = TempDir::new().unwrap();
        let store = SalaryStore::new(dir.path().join("salaries.txt"));

        store.reset().unwrap();
        store.append(&decimals(&[1])).unwrap();
        store.reset().unwrap();

        assert!(!store.exists());
    }
}
