// src/utils/errlog.rs

//! Durable per-run error log.
//!
//! Failures are collected in memory during the crawl and flushed to a
//! timestamped CSV under `logs/` at checkpoint time and at run end. The
//! console gets the same message immediately via `log`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::utils::csv;

const HEADER: [&str; 4] = ["message", "line_context", "source_url", "timestamp"];

/// One logged failure.
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub message: String,
    pub line_context: String,
    pub source_url: String,
    pub timestamp: String,
}

/// Accumulates failures for one run and writes them out as CSV.
#[derive(Debug)]
pub struct ErrorLog {
    dir: PathBuf,
    entries: Vec<ErrorEntry>,
}

impl ErrorLog {
    /// Create a log that will flush into `{data_dir}/logs/`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join("logs"),
            entries: Vec::new(),
        }
    }

    /// Record a failure with its originating context and source URL.
    pub fn record(&mut self, message: &str, line_context: &str, source_url: &str) {
        log::error!("{} [{}] {}", message, line_context, source_url);
        self.entries.push(ErrorEntry {
            message: message.to_string(),
            line_context: line_context.to_string(),
            source_url: source_url.to_string(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });
    }

    /// Number of failures recorded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write all recorded entries to a fresh timestamped file.
    ///
    /// Returns the written path, or `None` when there was nothing to flush.
    pub fn flush(&self) -> Result<Option<PathBuf>> {
        if self.entries.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.dir)?;
        let name = format!("log_{}.csv", Local::now().format("%Y-%m-%d_%H%M%S"));
        let path = self.dir.join(name);

        let rows: Vec<Vec<String>> = self
            .entries
            .iter()
            .map(|e| {
                vec![
                    e.message.clone(),
                    e.line_context.clone(),
                    e.source_url.clone(),
                    e.timestamp.clone(),
                ]
            })
            .collect();

        fs::write(&path, csv::to_csv_string(&HEADER, &rows))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flush_empty_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let errlog = ErrorLog::new(tmp.path());
        assert!(errlog.flush().unwrap().is_none());
        assert!(!tmp.path().join("logs").exists());
    }

    #[test]
    fn test_flush_writes_recorded_entries() {
        let tmp = TempDir::new().unwrap();
        let mut errlog = ErrorLog::new(tmp.path());
        errlog.record("Parse error", "normalize", "https://example.com/item");
        errlog.record("Duplicate item", "normalize", "https://example.com/other");

        let path = errlog.flush().unwrap().unwrap();
        let text = fs::read_to_string(path).unwrap();
        let rows = csv::parse_rows(&text);
        assert_eq!(rows.len(), 3); // header + 2 entries
        assert_eq!(rows[1][0], "Parse error");
        assert_eq!(rows[2][2], "https://example.com/other");
    }
}
