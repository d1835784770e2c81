// src/lib.rs

//! nutcrawl: incremental nutrition-catalog crawler.
//!
//! Walks a letter/page paginated food catalog, normalizes each item page
//! into relational CSV tables (items, conversions, nutrient junctions plus
//! unit/nutrient/category lookups), and checkpoints progress so a
//! multi-hour crawl survives interruption and per-item failures.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod store;
pub mod utils;
