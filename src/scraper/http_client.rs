use super::parsers::extract_container;
use super::{RenderRequest, Renderer, ScrapeError};
use crate::config::SourceConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Plain GET, no script execution. Only useful when the table is server-rendered.
pub struct HttpRenderer {
    inner: reqwest::Client,
}

impl HttpRenderer {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .timeout(config.timeout())
            .gzip(true)
            // Accept cookies so session-based pages work
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error {} for {}", status, url);
        }
        resp.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<String> {
        let html = self.get_text(&request.url).await?;

        extract_container(&html, &request.ready_selector)?.ok_or_else(|| {
            ScrapeError::ContainerNotFound {
                selector: request.ready_selector.clone(),
            }
            .into()
        })
    }
}
