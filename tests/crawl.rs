//! Crawl driver behavior against a stub fetcher serving canned pages.

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use nutcrawl::config::Config;
use nutcrawl::error::{AppError, Result};
use nutcrawl::pipeline::CrawlDriver;
use nutcrawl::services::PageFetcher;
use nutcrawl::store::CheckpointManager;
use nutcrawl::utils::StopFlag;

/// Serves canned page sources and records every requested URL. The request
/// log is shared so tests can inspect it after the driver consumed the stub.
struct StubFetcher {
    pages: HashMap<String, String>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    fn new(pages: Vec<(String, String)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn request_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requested)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requested
            .lock()
            .map_err(|_| AppError::fetch(url, "request log poisoned"))?
            .push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::fetch(url, "page not served"))
    }
}

fn test_config(data_dir: &std::path::Path, letters: &str) -> Arc<Config> {
    let mut config = Config::default();
    config.site.base_url = "https://catalog.test".to_string();
    config.site.letters = letters.to_string();
    config.crawler.request_delay_ms = 0;
    config.storage.data_dir = data_dir.to_path_buf();
    Arc::new(config)
}

fn listing_page(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|h| format!(r#"<a class="table_item_name" href="{h}">x</a>"#))
        .collect();
    format!("<html><body><table>{links}</table></body></html>")
}

fn item_page(name: &str) -> String {
    format!(
        r#"<html><body>
        <h1 id="food-name">{name}</h1>
        <select>
            <option value="2 tbsp = 32 g" selected="selected">2 tbsp</option>
            <option value="1 cup = 258 g">1 cup</option>
            <option value="100 g">100 g</option>
        </select>
        <table><tr><td id="calories">190</td></tr></table>
        <table class="center wide cellpadding3 nutrient results">
            <tr><th colspan="3">Fats</th></tr>
            <tr>
                <td class="left"><a class="tooltip" data-tooltip="Total Fat">Fat</a></td>
                <td class="right">16 g</td>
                <td><a target="_blank">20%</a></td>
            </tr>
        </table>
        </body></html>"#
    )
}

#[tokio::test]
async fn crawl_walks_pages_and_persists_the_dataset() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path(), "A");

    let fetcher = StubFetcher::new(vec![
        (
            config.listing_url('A', 1),
            listing_page(&["/Oats_1.html", "/Rice_2.html"]),
        ),
        (config.listing_url('A', 2), listing_page(&[])),
        (
            "https://catalog.test/Oats_1.html".to_string(),
            item_page("Oats by FarmCo"),
        ),
        (
            "https://catalog.test/Rice_2.html".to_string(),
            item_page("Rice by FarmCo"),
        ),
    ]);

    let driver = CrawlDriver::new(Arc::clone(&config), fetcher, StopFlag::new()).unwrap();
    let summary = driver.run().await.unwrap();

    assert_eq!(summary.items, 2);
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.failures, 0);
    assert!(!summary.cancelled);

    // Dataset written, checkpoint cleared on completion.
    let manager = CheckpointManager::new(tmp.path(), config.storage.tail_window);
    let (store, checkpoint) = manager.load().unwrap();
    assert_eq!(store.items().len(), 2);
    assert!(store.contains_item("Oats", "FarmCo"));
    assert!(store.contains_item("Rice", "FarmCo"));
    assert!(checkpoint.is_none());
    assert!(!tmp.path().join("restart.txt").exists());
}

#[tokio::test]
async fn item_failures_are_skipped_and_logged() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path(), "A");

    // Second link has no page behind it; third duplicates the first.
    let fetcher = StubFetcher::new(vec![
        (
            config.listing_url('A', 1),
            listing_page(&["/Oats_1.html", "/Gone_9.html", "/Oats_dup.html"]),
        ),
        (config.listing_url('A', 2), listing_page(&[])),
        (
            "https://catalog.test/Oats_1.html".to_string(),
            item_page("Oats by FarmCo"),
        ),
        (
            "https://catalog.test/Oats_dup.html".to_string(),
            item_page("Oats by FarmCo"),
        ),
    ]);

    let driver = CrawlDriver::new(Arc::clone(&config), fetcher, StopFlag::new()).unwrap();
    let summary = driver.run().await.unwrap();

    assert_eq!(summary.items, 1);
    assert_eq!(summary.failures, 2);
    assert!(!summary.cancelled);

    let manager = CheckpointManager::new(tmp.path(), config.storage.tail_window);
    let (store, _) = manager.load().unwrap();
    assert_eq!(store.items().len(), 1);

    // Both failures ended up in a flushed error log.
    let logs: Vec<_> = fs::read_dir(tmp.path().join("logs"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(logs.len(), 1);
    let text = fs::read_to_string(&logs[0]).unwrap();
    assert_eq!(text.lines().count(), 3); // header + 2 entries
}

#[tokio::test]
async fn listing_fetch_failure_ends_the_letter_but_not_the_run() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path(), "AB");

    // Letter A's first listing is unreachable; letter B crawls normally.
    let fetcher = StubFetcher::new(vec![
        (config.listing_url('B', 1), listing_page(&["/Oats_1.html"])),
        (config.listing_url('B', 2), listing_page(&[])),
        (
            "https://catalog.test/Oats_1.html".to_string(),
            item_page("Oats by FarmCo"),
        ),
    ]);
    let requests = fetcher.request_log();

    let driver = CrawlDriver::new(Arc::clone(&config), fetcher, StopFlag::new()).unwrap();
    let summary = driver.run().await.unwrap();

    assert_eq!(summary.items, 1);
    assert!(!summary.cancelled);
    assert!(requests.lock().unwrap().contains(&config.listing_url('B', 1)));

    let manager = CheckpointManager::new(tmp.path(), config.storage.tail_window);
    let (store, checkpoint) = manager.load().unwrap();
    assert!(store.contains_item("Oats", "FarmCo"));
    assert!(checkpoint.is_none());

    // The dead listing was recorded in the flushed error log.
    let logs: Vec<_> = fs::read_dir(tmp.path().join("logs"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(logs.len(), 1);
    let text = fs::read_to_string(&logs[0]).unwrap();
    assert_eq!(text.lines().count(), 2); // header + the listing failure
    assert!(text.contains(&config.listing_url('A', 1)));
}

#[tokio::test]
async fn pre_triggered_stop_checkpoints_before_any_fetch() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path(), "A");
    let fetcher = StubFetcher::new(Vec::new());

    let stop = StopFlag::new();
    stop.trigger();

    let driver = CrawlDriver::new(Arc::clone(&config), fetcher, stop).unwrap();
    let summary = driver.run().await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.items, 0);
    assert_eq!(
        fs::read_to_string(tmp.path().join("restart.txt")).unwrap(),
        "A 1"
    );
}

#[tokio::test]
async fn resume_skips_letters_before_the_checkpoint() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path(), "AB");

    let manager = CheckpointManager::new(tmp.path(), config.storage.tail_window);
    manager
        .save_checkpoint(&nutcrawl::models::Checkpoint::new('B', 2))
        .unwrap();

    let fetcher = StubFetcher::new(vec![(config.listing_url('B', 2), listing_page(&[]))]);
    let requests = fetcher.request_log();

    let driver = CrawlDriver::new(Arc::clone(&config), fetcher, StopFlag::new()).unwrap();
    let summary = driver.run().await.unwrap();
    assert!(!summary.cancelled);

    // The whole of letter A was skipped; only the checkpointed page was hit.
    assert_eq!(*requests.lock().unwrap(), vec![config.listing_url('B', 2)]);
    assert!(!tmp.path().join("restart.txt").exists());
}
