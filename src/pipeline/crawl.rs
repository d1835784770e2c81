// src/pipeline/crawl.rs

//! Crawl driver: walks the catalog's letter/page pagination and feeds each
//! item page through the normalizer.
//!
//! The walk is strictly sequential (letter, then page, then link order).
//! Item-level failures are rolled back, logged and skipped; a listing fetch
//! failure ends the current letter early; anything else terminates the run
//! after a checkpoint save. Cancellation is polled at page and item
//! boundaries and triggers a checkpoint-and-exit with the current,
//! not-yet-completed cursor.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use scraper::Html;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Checkpoint;
use crate::pipeline::normalize::normalize_item;
use crate::services::{PageFetcher, extract};
use crate::store::{CheckpointManager, TableStore};
use crate::utils::{ErrorLog, StopFlag};

/// Counters for one crawl run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    pub items: usize,
    pub conversions: usize,
    pub nutrients: usize,
    pub pages: usize,
    pub failures: usize,
    /// Whether the run ended on an operator stop rather than completion.
    pub cancelled: bool,
}

/// Sequential catalog crawler.
pub struct CrawlDriver<F: PageFetcher> {
    config: Arc<Config>,
    fetcher: F,
    manager: CheckpointManager,
    store: TableStore,
    checkpoint: Option<Checkpoint>,
    errors: ErrorLog,
    stop: StopFlag,
    summary: CrawlSummary,
}

impl<F: PageFetcher> CrawlDriver<F> {
    /// Load (or create) the dataset and build a driver ready to run.
    pub fn new(config: Arc<Config>, fetcher: F, stop: StopFlag) -> Result<Self> {
        let manager =
            CheckpointManager::new(&config.storage.data_dir, config.storage.tail_window);
        let (store, checkpoint) = manager.load()?;
        let errors = ErrorLog::new(&config.storage.data_dir);

        log::info!(
            "Loaded dataset: {} items (window), {} units, {} nutrients, {} categories",
            store.items().len(),
            store.units().len(),
            store.nutrient_names().len(),
            store.categories().len()
        );

        Ok(Self {
            config,
            fetcher,
            manager,
            store,
            checkpoint,
            errors,
            stop,
            summary: CrawlSummary::default(),
        })
    }

    /// Run the crawl to completion, cancellation or fatal error.
    pub async fn run(mut self) -> Result<CrawlSummary> {
        let letters = self.config.letters();
        let (start_idx, mut resume_page) = self.resume_point(&letters);

        for &letter in &letters[start_idx..] {
            let mut page = resume_page.take().unwrap_or(1);

            loop {
                if self.stop.is_set() {
                    return self.finish_cancelled(letter, page);
                }

                let listing_url = self.config.listing_url(letter, page);
                let links = match self.fetch_listing(&listing_url).await {
                    Ok(links) => links,
                    Err(error) if error.is_item_failure() => {
                        // A dead listing page ends this letter, not the run.
                        self.errors
                            .record(&error.to_string(), "listing", &listing_url);
                        break;
                    }
                    Err(error) => return self.fail(letter, page, error),
                };
                if links.is_empty() {
                    log::debug!("No items for letter {} page {}, next letter", letter, page);
                    break;
                }

                log::info!(
                    "Letter {} page {}: {} item links",
                    letter,
                    page,
                    links.len()
                );
                self.summary.pages += 1;

                let mut queue: VecDeque<String> = links.into();
                while let Some(href) = queue.pop_front() {
                    if self.stop.is_set() {
                        return self.finish_cancelled(letter, page);
                    }
                    if let Err(error) = self.process_item(&href).await {
                        return self.fail(letter, page, error);
                    }
                    self.delay().await;
                }

                page += 1;
                self.delay().await;
            }
        }

        self.manager.save(&self.store)?;
        self.manager.clear_checkpoint()?;
        self.errors.flush()?;
        log::info!("Catalog walk complete");
        Ok(self.summary)
    }

    /// Where to start, honoring a persisted checkpoint.
    fn resume_point(&self, letters: &[char]) -> (usize, Option<u32>) {
        if let Some(cp) = self.checkpoint {
            if let Some(idx) = letters.iter().position(|&l| l == cp.letter) {
                log::info!("Resuming from checkpoint: letter {} page {}", cp.letter, cp.page);
                return (idx, Some(cp.page));
            }
            log::warn!(
                "Checkpoint letter {} is not in the configured letters; starting fresh",
                cp.letter
            );
        }
        (0, None)
    }

    /// Fetch a listing page and extract its item links.
    async fn fetch_listing(&self, url: &str) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(url).await?;
        let doc = Html::parse_document(&html);
        extract::item_links(&doc)
    }

    /// Fetch and normalize one item. Item-level failures are absorbed here
    /// (rollback, log, skip); only fatal errors propagate.
    async fn process_item(&mut self, href: &str) -> Result<()> {
        let url = match self.config.item_url(href) {
            Ok(url) => url,
            Err(error) => {
                self.errors.record(&error.to_string(), "item link", href);
                self.summary.failures += 1;
                return Ok(());
            }
        };

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(error) => {
                self.errors.record(&error.to_string(), "item fetch", &url);
                self.summary.failures += 1;
                return Ok(());
            }
        };

        let doc = Html::parse_document(&html);
        match normalize_item(&doc, &mut self.store) {
            Ok(normalized) => {
                self.summary.items += 1;
                self.summary.conversions += normalized.conversions;
                self.summary.nutrients += normalized.nutrients;
                log::info!(
                    "Added item {} ({} conversions, {} nutrient rows)",
                    normalized.item_id,
                    normalized.conversions,
                    normalized.nutrients
                );
                Ok(())
            }
            Err(failure) => {
                if let Some(item_id) = failure.item_id {
                    let removed = self.store.remove_item(item_id);
                    log::warn!("Rolled back item {} ({} rows)", item_id, removed);
                }
                if failure.error.is_item_failure() {
                    self.errors
                        .record(&failure.error.to_string(), "normalize", &url);
                    self.summary.failures += 1;
                    Ok(())
                } else {
                    Err(failure.error)
                }
            }
        }
    }

    /// Checkpoint and exit cleanly on an operator stop.
    fn finish_cancelled(mut self, letter: char, page: u32) -> Result<CrawlSummary> {
        log::info!("Stop requested; checkpointing at letter {} page {}", letter, page);
        self.manager.save(&self.store)?;
        self.manager
            .save_checkpoint(&Checkpoint::new(letter, page))?;
        self.errors.flush()?;
        self.summary.cancelled = true;
        Ok(self.summary)
    }

    /// Best-effort checkpoint before surfacing a fatal error.
    fn fail(&mut self, letter: char, page: u32, error: AppError) -> Result<CrawlSummary> {
        log::error!("Fatal error at letter {} page {}: {}", letter, page, error);
        if let Err(save_error) = self.manager.save(&self.store) {
            log::error!("Checkpoint save also failed: {}", save_error);
        } else if let Err(cp_error) = self
            .manager
            .save_checkpoint(&Checkpoint::new(letter, page))
        {
            log::error!("Checkpoint cursor save failed: {}", cp_error);
        }
        let _ = self.errors.flush();
        Err(error)
    }

    async fn delay(&self) {
        let ms = self.config.crawler.request_delay_ms;
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}
