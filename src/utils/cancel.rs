// src/utils/cancel.rs

//! Cooperative cancellation signal.
//!
//! One operator task sets the flag exactly once; the crawl driver polls it
//! at page and item boundaries. The flag is never cleared during a run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared stop-requested flag.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    inner: Arc<AtomicBool>,
}

impl StopFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Safe to call more than once.
    pub fn trigger(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_set(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}
