//! stockwatch CLI
//!
//! Polls the inventory feed and e-mails once per new matching listing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stockwatch::{
    config,
    error::Result,
    models::Config,
    pipeline::{Watcher, listen_for_signals},
    services::{EmailNotifier, InventoryClient},
    storage::{DedupStore, FileDedupStore},
};

/// stockwatch - inventory alerting
#[derive(Parser, Debug)]
#[command(name = "stockwatch", version, about = "Inventory alerting")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "stockwatch.toml")]
    config: PathBuf,

    /// Override the dedup store directory
    #[arg(long, global = true)]
    store_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll forever until interrupted
    Run {
        /// Override the pause between cycles, in seconds
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Run a single cycle and exit
    Once,

    /// Validate configuration
    Validate,

    /// Show dedup store info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Wire the HTTP source, file store and SMTP notifier together.
fn build_watcher(config: &Config) -> Result<Watcher> {
    let password = config::require_secret(&config.email.password_env)?;

    let source = InventoryClient::new(config.source.clone())?;
    let store = FileDedupStore::new(&config.store.dir);
    let notifier = EmailNotifier::new(&config.email, password)?;

    log::info!("Polling {}", source.url().host_str().unwrap_or("inventory"));
    log::info!("Recording sent alerts under {}", store.root_dir().display());

    Ok(Watcher::new(source, config.filter.clone(), store, notifier))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = config::load_config(&cli.config)?;
    if let Some(dir) = cli.store_dir {
        config.store.dir = dir;
    }

    match cli.command {
        Command::Run { interval } => {
            if let Some(secs) = interval {
                config.schedule.interval_secs = secs;
            }
            config.validate()?;

            // Before the first cycle, so a signal never interrupts one.
            let shutdown = listen_for_signals()?;
            let watcher = build_watcher(&config)?;
            log::info!(
                "stockwatch starting, polling every {}s",
                config.schedule.interval_secs
            );

            let cycles = watcher
                .serve(config.schedule.interval(), shutdown.wait())
                .await;
            log::info!("Stopped after {} cycles", cycles);
        }

        Command::Once => {
            let watcher = build_watcher(&config)?;
            let report = watcher.run_once().await?;
            log::info!(
                "{} fetched, {} matched, {} new, {} already notified",
                report.fetched,
                report.matched,
                report.notified,
                report.already_notified
            );
        }

        Command::Validate => {
            config.validate()?;
            log::info!("✓ Config OK ({})", cli.config.display());
        }

        Command::Info => {
            let store = FileDedupStore::new(&config.store.dir);
            log::info!("Store directory: {}", store.root_dir().display());
            log::info!("Listings notified: {}", store.notified_count().await?);
            log::info!("Poll interval: {}s", config.schedule.interval_secs);
        }
    }

    Ok(())
}
