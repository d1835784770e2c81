// src/services/mod.rs

//! External collaborators: HTTP fetching and page field extraction.

pub mod extract;
pub mod fetch;

pub use fetch::{HttpFetcher, PageFetcher};
