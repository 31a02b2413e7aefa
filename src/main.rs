mod config;
mod models;
mod notifier;
mod pipeline;
mod scraper;
mod storage;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use crate::scraper::parsers::{extract_container, parse_hot_table};
use crate::storage::HistoryStore;
use crate::utils::{Clock, LocalClock};

#[derive(Parser)]
#[command(name = "weibo-hot", about = "Weibo trending-topics recorder", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape once, append a snapshot and update the README (default)
    Run,

    /// Show today's history file statistics
    Stats,

    /// Parse a saved HTML page and print the extracted topics as JSON
    Parse {
        /// Page or container fragment saved from the trending page
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "weibo_hot=info,warn",
        1 => "weibo_hot=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let _t = utils::Timer::start("Trending snapshot");
            let stats = Pipeline::new(config)?.run().await?;
            info!(
                "Done: {} topics ({} pinned) at {} | {} snapshots in {:?}",
                stats.topics, stats.pinned, stats.time, stats.snapshots, stats.history_path
            );
        }

        Command::Stats => {
            let store = HistoryStore::for_date(&config.storage, LocalClock.today());
            let history = store.load();
            let entries: u64 = history.iter().map(|s| s.hots.len() as u64).sum();
            let first = history.first().map(|s| s.time.as_str()).unwrap_or("—");
            let last = history.last().map(|s| s.time.as_str()).unwrap_or("—");
            println!("─────────────────────────────────");
            println!("  Weibo hot — History Stats");
            println!("─────────────────────────────────");
            println!("  File      : {}", store.path().display());
            println!("  Snapshots : {}", utils::fmt_number(history.len() as u64));
            println!("  Entries   : {}", utils::fmt_number(entries));
            println!("  First     : {}", first);
            println!("  Last      : {}", last);
            println!("─────────────────────────────────");
        }

        Command::Parse { file } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let container = extract_container(&html, &config.source.ready_selector)?.unwrap_or(html);
            let entries = parse_hot_table(&container)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}
