//! Pipeline orchestrator: renderer → parser → history → status line.
//!
//! One `run()` performs a single pass:
//!   1. Render the trending page and grab the table container
//!   2. Parse rows into topic entries
//!   3. Load today's history, append a timestamped snapshot, save
//!   4. Rewrite the status line in the README
//!
//! Any failure aborts the remaining steps. A missing README is reported after
//! the history has already been saved.

use crate::config::AppConfig;
use crate::models::Snapshot;
use crate::notifier::StatusFile;
use crate::scraper::parsers::parse_hot_table;
use crate::scraper::{RenderRequest, Renderer, build_renderer};
use crate::storage::HistoryStore;
use crate::utils::{Clock, LocalClock, format_timestamp};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct Pipeline {
    renderer: Box<dyn Renderer>,
    request: RenderRequest,
    store: HistoryStore,
    status: StatusFile,
    clock: Arc<dyn Clock>,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Result<Self> {
        let renderer = build_renderer(&config.source)?;
        Ok(Self::with_parts(&config, renderer, Arc::new(LocalClock)))
    }

    /// The history file date is fixed here, from the clock at construction.
    pub fn with_parts(config: &AppConfig, renderer: Box<dyn Renderer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            renderer,
            request: RenderRequest::from_config(&config.source),
            store: HistoryStore::for_date(&config.storage, clock.today()),
            status: StatusFile::new(&config.status),
            clock,
        }
    }

    pub async fn run(&self) -> Result<RunStats> {
        info!("=== Step 1: Rendering {} ===", self.request.url);
        let html = self
            .renderer
            .render(&self.request)
            .await
            .context("Render failed")?;
        let time = format_timestamp(self.clock.now());

        info!("=== Step 2: Parsing table ===");
        let hots = parse_hot_table(&html).context("Parse failed")?;
        let pinned = hots.iter().filter(|e| e.is_pinned()).count();
        info!("{} topics ({} pinned)", hots.len(), pinned);

        info!("=== Step 3: Appending to {:?} ===", self.store.path());
        let mut history = self.store.load();
        let topics = hots.len();
        history.push(Snapshot {
            time: time.clone(),
            hots,
        });
        self.store.save(&history)?;

        info!("=== Step 4: Updating status line ===");
        self.status.update(&time)?;

        Ok(RunStats {
            time,
            topics,
            pinned,
            snapshots: history.len(),
            history_path: self.store.path().to_path_buf(),
        })
    }
}

#[derive(Debug)]
pub struct RunStats {
    pub time: String,
    pub topics: usize,
    pub pinned: usize,
    pub snapshots: usize,
    pub history_path: PathBuf,
}
