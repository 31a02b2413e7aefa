pub mod browser;
pub mod cleaner;
pub mod fixture;
pub mod http_client;
pub mod parsers;

use crate::config::{RendererKind, SourceConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use self::browser::ChromeRenderer;
use self::fixture::FixtureRenderer;
use self::http_client::HttpRenderer;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("`{selector}` not visible after {timeout:?}")]
    WaitTimeout { selector: String, timeout: Duration },

    #[error("`{selector}` not found in page")]
    ContainerNotFound { selector: String },

    #[error("row {row}: missing {element}")]
    MissingElement { row: usize, element: &'static str },

    #[error("row {row}: invalid number {text:?}")]
    InvalidNumber { row: usize, text: String },

    #[error("row {row}: malformed score {text:?}")]
    MalformedScore { row: usize, text: String },

    #[error("invalid selector {0:?}")]
    Selector(String),
}

// ── Renderer trait ────────────────────────────────────────────────────────────

/// What to load and which element marks the page as ready.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub url: String,
    pub ready_selector: String,
    pub timeout: Duration,
}

impl RenderRequest {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            url: config.url.clone(),
            ready_selector: config.ready_selector.clone(),
            timeout: config.timeout(),
        }
    }
}

/// Swappable page source. Returns the HTML of the ready element.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<String>;
}

pub fn build_renderer(config: &SourceConfig) -> Result<Box<dyn Renderer>> {
    Ok(match config.renderer {
        RendererKind::Chrome => Box::new(ChromeRenderer::new(config)),
        RendererKind::Http => {
            Box::new(HttpRenderer::new(config).context("Failed to build HTTP renderer")?)
        }
        RendererKind::Fixture => {
            let path = config
                .fixture_path
                .clone()
                .context("fixture renderer needs source.fixture_path")?;
            Box::new(FixtureRenderer::new(path))
        }
    })
}
