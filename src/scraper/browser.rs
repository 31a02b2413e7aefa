use super::{RenderRequest, Renderer, ScrapeError};
use crate::config::SourceConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use serde_json::Value;
use std::ffi::OsStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_PERIOD: Duration = Duration::from_millis(250);

const IS_VISIBLE_JS: &str = "function() {
    const style = window.getComputedStyle(this);
    const rect = this.getBoundingClientRect();
    return style.display !== 'none' && style.visibility !== 'hidden'
        && rect.width > 0 && rect.height > 0;
}";

/// Renders the page in a Chrome instance launched for this call only.
pub struct ChromeRenderer {
    headless: bool,
    user_agent: Option<String>,
}

impl ChromeRenderer {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            headless: config.headless,
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<String> {
        let headless = self.headless;
        let user_agent = self.user_agent.clone();
        let request = request.clone();

        tokio::task::spawn_blocking(move || render_blocking(headless, user_agent.as_deref(), &request))
            .await
            .context("Browser task panicked")?
    }
}

fn launch(headless: bool) -> Result<Browser> {
    Browser::new(LaunchOptions {
        args: vec![OsStr::new("--disable-blink-features=AutomationControlled")],
        headless,
        ..LaunchOptions::default()
    })
    .context("Failed to launch Chrome")
}

// The browser process is killed when `browser` drops at the end of this call.
fn render_blocking(headless: bool, user_agent: Option<&str>, request: &RenderRequest) -> Result<String> {
    info!("Launching Chrome (headless={})", headless);
    let browser = launch(headless)?;
    let tab = browser.new_tab().context("Failed to open tab")?;

    if let Some(ua) = user_agent {
        tab.set_user_agent(ua, None, None)?;
    }

    debug!("Navigating to {}", request.url);
    tab.navigate_to(&request.url)
        .with_context(|| format!("Failed to navigate to {}", request.url))?;

    let element = wait_until_visible(&tab, &request.ready_selector, request.timeout)?;
    let html = element
        .get_content()
        .context("Failed to read container HTML")?;

    debug!("Rendered {} bytes from {}", html.len(), request.ready_selector);
    Ok(html)
}

/// Poll until `selector` exists and is visible, or fail with `WaitTimeout`.
fn wait_until_visible<'tab>(tab: &'tab Tab, selector: &str, timeout: Duration) -> Result<Element<'tab>> {
    let deadline = Instant::now() + timeout;

    loop {
        match tab.find_element(selector) {
            Ok(element) => {
                if is_visible(&element)? {
                    return Ok(element);
                }
                debug!("{} present but hidden", selector);
            }
            // the document may still be loading; keep polling until the deadline
            Err(err) => debug!("{} not found yet: {}", selector, err),
        }

        if Instant::now() >= deadline {
            return Err(ScrapeError::WaitTimeout {
                selector: selector.to_string(),
                timeout,
            }
            .into());
        }
        std::thread::sleep(POLL_PERIOD);
    }
}

fn is_visible(element: &Element<'_>) -> Result<bool> {
    let result = element.call_js_fn(IS_VISIBLE_JS, Vec::new(), false)?;
    Ok(matches!(result.value, Some(Value::Bool(true))))
}
