// src/config.rs

//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog site layout
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Dataset persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if Url::parse(&self.site.base_url).is_err() {
            return Err(AppError::config("site.base_url is not a valid URL"));
        }
        if self.site.letters.is_empty() {
            return Err(AppError::config("site.letters is empty"));
        }
        if !self.site.letters.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(AppError::config(
                "site.letters must be uppercase ASCII letters",
            ));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.storage.tail_window == 0 {
            return Err(AppError::config("storage.tail_window must be > 0"));
        }
        Ok(())
    }

    /// Catalog letters in crawl order.
    pub fn letters(&self) -> Vec<char> {
        self.site.letters.chars().collect()
    }

    /// URL of the paginated listing for a catalog letter.
    pub fn listing_url(&self, letter: char, page: u32) -> String {
        format!(
            "{}{}{}_{}{}{}",
            self.site.base_url,
            self.site.foods_prefix,
            letter,
            self.site.page_prefix,
            page,
            self.site.page_suffix
        )
    }

    /// Resolve an item href against the site base URL.
    pub fn item_url(&self, href: &str) -> Result<String> {
        let base = Url::parse(&self.site.base_url)
            .map_err(|e| AppError::config(format!("site.base_url: {e}")))?;
        let joined = base
            .join(href)
            .map_err(|e| AppError::parse("item link", e))?;
        Ok(joined.to_string())
    }
}

/// Catalog site URL layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site root, no trailing slash
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path fragment before the catalog letter
    #[serde(default = "defaults::foods_prefix")]
    pub foods_prefix: String,

    /// Path fragment before the page number
    #[serde(default = "defaults::page_prefix")]
    pub page_prefix: String,

    /// Listing page file suffix
    #[serde(default = "defaults::page_suffix")]
    pub page_suffix: String,

    /// Catalog letters in crawl order
    #[serde(default = "defaults::letters")]
    pub letters: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            foods_prefix: defaults::foods_prefix(),
            page_prefix: defaults::page_prefix(),
            page_suffix: defaults::page_suffix(),
            letters: defaults::letters(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Dataset persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the CSV tables, checkpoint and error logs
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,

    /// Rows of each per-item table kept resident across a restart.
    /// Load and save must use the same depth.
    #[serde(default = "defaults::tail_window")]
    pub tail_window: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
            tail_window: defaults::tail_window(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn base_url() -> String {
        "https://www.nutritionvalue.org".into()
    }
    pub fn foods_prefix() -> String {
        "/foods_start_with_".into()
    }
    pub fn page_prefix() -> String {
        "page_".into()
    }
    pub fn page_suffix() -> String {
        ".html".into()
    }
    pub fn letters() -> String {
        "ABCDEFGHIJKLMNOPQRSTUVWXYZ".into()
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; nutcrawl/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        250
    }

    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }
    pub fn tail_window() -> usize {
        20
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_lowercase_letters() {
        let mut config = Config::default();
        config.site.letters = "abc".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut config = Config::default();
        config.storage.tail_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_listing_url() {
        let config = Config::default();
        assert_eq!(
            config.listing_url('A', 3),
            "https://www.nutritionvalue.org/foods_start_with_A_page_3.html"
        );
    }

    #[test]
    fn test_item_url_joins_relative_href() {
        let config = Config::default();
        let url = config.item_url("/Oats_123.html").unwrap();
        assert_eq!(url, "https://www.nutritionvalue.org/Oats_123.html");
    }
}
