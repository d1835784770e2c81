// src/pipeline/mod.rs

//! Pipeline entry points: normalization and the crawl driver.

pub mod crawl;
pub mod normalize;

pub use crawl::{CrawlDriver, CrawlSummary};
pub use normalize::{NormalizeFailure, NormalizedItem, normalize_item};
