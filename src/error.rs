// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction or transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A page or item document could not be fetched
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Document shape did not match expectations
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// Natural-key collision on (name, brand)
    #[error("Duplicate item [{name} / {brand}]")]
    DuplicateItem { name: String, brand: String },

    /// Caller passed a value the operation cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Expected structural element absent from the document
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted table file is malformed
    #[error("Table error in {file}: {message}")]
    Table { file: String, message: String },
}

impl AppError {
    /// Create a fetch error with the offending URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a duplicate-item error.
    pub fn duplicate(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self::DuplicateItem {
            name: name.into(),
            brand: brand.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a table error for a persisted file.
    pub fn table(file: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Table {
            file: file.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error is confined to a single item.
    ///
    /// Item-level errors are rolled back, logged and skipped by the crawl
    /// driver; anything else terminates the run after a checkpoint save.
    pub fn is_item_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. }
                | Self::Parse { .. }
                | Self::DuplicateItem { .. }
                | Self::InvalidArgument(_)
                | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_failure_classification() {
        assert!(AppError::parse("nlea", "bad shape").is_item_failure());
        assert!(AppError::duplicate("Oats", "BrandX").is_item_failure());
        assert!(AppError::not_found("h1#food-name").is_item_failure());
        assert!(AppError::invalid_argument("empty nutrient").is_item_failure());
        assert!(AppError::fetch("http://x", "timeout").is_item_failure());
        assert!(!AppError::config("bad letters").is_item_failure());
        assert!(!AppError::table("items.csv", "short row").is_item_failure());
    }
}
