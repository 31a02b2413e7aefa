use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

/// Which page to render and how
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Container that must be visible before the page counts as rendered.
    #[serde(default = "default_ready_selector")]
    pub ready_selector: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub renderer: RendererKind,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// Saved page used by the `fixture` renderer.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Chrome,
    Http,
    Fixture,
}

/// History file location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

/// Status line in the README
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusConfig {
    #[serde(default = "default_status_path")]
    pub path: PathBuf,

    #[serde(default = "default_status_prefix")]
    pub prefix: String,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_url() -> String {
    "https://s.weibo.com/top/summary?cate=realtimehot".to_string()
}
fn default_ready_selector() -> String {
    "#pl_top_realtimehot".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_file_prefix() -> String {
    "weibo_hot".to_string()
}
fn default_status_path() -> PathBuf {
    PathBuf::from("README.md")
}
fn default_status_prefix() -> String {
    "last update:".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            ready_selector: default_ready_selector(),
            timeout_secs: default_timeout_secs(),
            renderer: RendererKind::default(),
            headless: true,
            user_agent: None,
            fixture_path: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_prefix: default_file_prefix(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            path: default_status_path(),
            prefix: default_status_prefix(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("WEIBO_HOT").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|e| {
            warn!("Invalid configuration ({}), using defaults", e);
            AppConfig::default()
        });
        app_cfg.validate()?;
        Ok(app_cfg)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.url)
            .with_context(|| format!("Invalid source url {:?}", self.source.url))?;

        if self.source.renderer == RendererKind::Fixture && self.source.fixture_path.is_none() {
            anyhow::bail!("renderer = \"fixture\" requires source.fixture_path");
        }
        Ok(())
    }
}
