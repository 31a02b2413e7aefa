use super::parsers::extract_container;
use super::{RenderRequest, Renderer, ScrapeError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Serves a saved copy of the page instead of loading `request.url`.
pub struct FixtureRenderer {
    path: PathBuf,
}

impl FixtureRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Renderer for FixtureRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<String> {
        info!("Reading page from {:?} instead of {}", self.path, request.url);
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read fixture {:?}", self.path))?;

        extract_container(&html, &request.ready_selector)?.ok_or_else(|| {
            ScrapeError::ContainerNotFound {
                selector: request.ready_selector.clone(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::parsers::fixtures::SAMPLE_PAGE;
    use std::time::Duration;

    fn request(selector: &str) -> RenderRequest {
        RenderRequest {
            url: "https://example.invalid/".into(),
            ready_selector: selector.into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_returns_container_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, SAMPLE_PAGE).unwrap();

        let html = FixtureRenderer::new(&path)
            .render(&request("#pl_top_realtimehot"))
            .await
            .unwrap();
        assert!(html.starts_with("<div id=\"pl_top_realtimehot\">"));
        assert!(!html.contains("<title>"));
    }

    #[tokio::test]
    async fn test_missing_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<html><body><p>login</p></body></html>").unwrap();

        let err = FixtureRenderer::new(&path)
            .render(&request("#pl_top_realtimehot"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::ContainerNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let renderer = FixtureRenderer::new("/nonexistent/page.html");
        let result = tokio_test::block_on(renderer.render(&request("#x")));
        assert!(result.is_err());
    }
}
