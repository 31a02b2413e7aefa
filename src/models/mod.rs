use serde::{Deserialize, Serialize};

// ── Topic entry ───────────────────────────────────────────────────────────────

/// One row of the trending table.
///
/// `rank` is 0 for pinned rows, which carry no real rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicEntry {
    pub rank: u64,
    pub topic: String,
    pub score: u64,
    pub tag: String,
}

impl TopicEntry {
    pub fn pinned(topic: impl Into<String>) -> Self {
        Self {
            rank: 0,
            topic: topic.into(),
            score: 0,
            tag: PINNED_TAG.to_string(),
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.rank == 0 && self.tag == PINNED_TAG
    }
}

pub const PINNED_TAG: &str = "top";

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// One scrape result. Field order matches the on-disk layout: `time`, then `hots`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub time: String,
    pub hots: Vec<TopicEntry>,
}

// ── Row classification ────────────────────────────────────────────────────────

/// How a table row was interpreted before its cells are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Pinned,
    Ranked(u64),
    Skipped,
}
