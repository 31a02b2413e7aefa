//! Append-only snapshot history, one JSON file per calendar day.
//!
//! The file is a single pretty-printed JSON array (2-space indent, non-ASCII
//! written literally). Writes overwrite the whole file in place; concurrent
//! runs against the same file are not coordinated and the last writer wins.

use crate::config::StorageConfig;
use crate::models::Snapshot;
use crate::utils::format_file_date;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// `<data_dir>/<prefix>_<YYYY_MM_DD>.json`
    pub fn for_date(config: &StorageConfig, date: NaiveDate) -> Self {
        let name = format!("{}_{}.json", config.file_prefix, format_file_date(date));
        Self::at(config.data_dir.join(name))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prior snapshots, or an empty history if the file is absent or unreadable.
    pub fn load(&self) -> Vec<Snapshot> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history at {:?}, starting fresh", self.path);
                return Vec::new();
            }
            Err(e) => {
                warn!("Could not read {:?} ({}), starting fresh", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Snapshot>>(&text) {
            Ok(history) => {
                debug!("Loaded {} snapshots from {:?}", history.len(), self.path);
                history
            }
            Err(e) => {
                warn!("Corrupt history {:?} ({}), starting fresh", self.path, e);
                Vec::new()
            }
        }
    }

    /// Overwrite the file with `history`, which must already hold prior + new snapshots.
    pub fn save(&self, history: &[Snapshot]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create dir {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(history).context("Failed to serialise history")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {:?}", self.path))?;

        info!("Saved {} snapshots to {:?}", history.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TopicEntry;

    fn snapshot(time: &str, topic: &str) -> Snapshot {
        Snapshot {
            time: time.into(),
            hots: vec![TopicEntry {
                rank: 1,
                topic: topic.into(),
                score: 100,
                tag: "热".into(),
            }],
        }
    }

    #[test]
    fn test_path_embeds_date() {
        let cfg = StorageConfig::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let store = HistoryStore::for_date(&cfg, date);
        assert_eq!(store.path(), Path::new("data/weibo_hot_2024_03_07.json"));
    }

    #[test]
    fn test_load_missing_and_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path().join("h.json"));
        assert!(store.load().is_empty());

        std::fs::write(store.path(), "[]").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path().join("h.json"));

        std::fs::write(store.path(), "[{\"time\": ").unwrap();
        assert!(store.load().is_empty());

        // valid JSON, wrong shape
        std::fs::write(store.path(), "{\"time\": \"x\"}").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path().join("h.json"));

        let mut history = vec![snapshot("2024/01/01 00:00:00", "甲"), snapshot("2024/01/01 01:00:00", "乙")];
        store.save(&history).unwrap();

        let mut loaded = store.load();
        assert_eq!(loaded, history);

        let next = snapshot("2024/01/01 02:00:00", "丙");
        loaded.push(next.clone());
        store.save(&loaded).unwrap();

        history.push(next);
        assert_eq!(store.load(), history);
    }

    #[test]
    fn test_output_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path().join("h.json"));
        store.save(&[snapshot("2024/01/01 00:00:00", "话题")]).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let expected = r#"[
  {
    "time": "2024/01/01 00:00:00",
    "hots": [
      {
        "rank": 1,
        "topic": "话题",
        "score": 100,
        "tag": "热"
      }
    ]
  }
]"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_save_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = StorageConfig {
            data_dir: dir.path().join("data"),
            file_prefix: "weibo_hot".into(),
        };
        let store = HistoryStore::for_date(&cfg, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        store.save(&[]).unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[]");
    }
}
