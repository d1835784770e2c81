//! nutcrawl CLI
//!
//! Local execution entry point for the catalog crawler.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use nutcrawl::{
    config::Config,
    error::Result,
    pipeline::CrawlDriver,
    services::HttpFetcher,
    store::CheckpointManager,
    utils::StopFlag,
};

/// nutcrawl - incremental nutrition catalog crawler
#[derive(Parser, Debug)]
#[command(name = "nutcrawl", version, about = "Nutrition catalog crawler")]
struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = "nutcrawl.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the catalog, resuming from a checkpoint if one exists
    Crawl {
        /// Ignore any existing checkpoint and start from the first letter
        #[arg(long)]
        fresh: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show dataset and checkpoint status
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    match cli.command {
        Command::Crawl { fresh } => {
            let manager =
                CheckpointManager::new(&config.storage.data_dir, config.storage.tail_window);
            if fresh {
                log::info!("--fresh: discarding any existing checkpoint");
                manager.clear_checkpoint()?;
            }

            let stop = StopFlag::new();
            let watcher_flag = stop.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("Stop requested; finishing the current item and checkpointing...");
                    watcher_flag.trigger();
                }
            });

            let config = Arc::new(config);
            let fetcher = HttpFetcher::new(&config.crawler)?;
            let driver = CrawlDriver::new(Arc::clone(&config), fetcher, stop)?;

            let summary = driver.run().await?;
            log::info!(
                "Run {}: {} items, {} conversions, {} nutrient rows over {} pages ({} failures)",
                if summary.cancelled {
                    "interrupted"
                } else {
                    "complete"
                },
                summary.items,
                summary.conversions,
                summary.nutrients,
                summary.pages,
                summary.failures
            );
            if summary.cancelled {
                log::info!("Dataset saved; it is safe to close now.");
            }
        }

        Command::Validate => {
            log::info!("Configuration OK");
            log::info!("Catalog letters: {}", config.site.letters);
            log::info!("Data directory: {}", config.storage.data_dir.display());
        }

        Command::Info => {
            let manager =
                CheckpointManager::new(&config.storage.data_dir, config.storage.tail_window);
            let (store, checkpoint) = manager.load()?;
            log::info!(
                "Working set: {} items / {} conversions / {} nutrient rows (tail window {})",
                store.items().len(),
                store.conversions().len(),
                store.nutrient_junctions().len(),
                manager.window()
            );
            log::info!(
                "Lookups: {} units, {} nutrients, {} categories",
                store.units().len(),
                store.nutrient_names().len(),
                store.categories().len()
            );
            match checkpoint {
                Some(cp) => log::info!("Checkpoint: letter {} page {}", cp.letter, cp.page),
                None => log::info!("No checkpoint; next crawl starts fresh"),
            }
        }
    }

    Ok(())
}
