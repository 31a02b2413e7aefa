use crate::config::StatusConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// README-like file holding a single `<prefix> <timestamp>` line.
pub struct StatusFile {
    path: PathBuf,
    prefix: String,
}

impl StatusFile {
    pub fn new(config: &StatusConfig) -> Self {
        Self {
            path: config.path.clone(),
            prefix: config.prefix.clone(),
        }
    }

    /// Rewrite the status line. Returns false when no line carries the prefix,
    /// in which case the file is written back unchanged.
    pub fn update(&self, timestamp: &str) -> Result<bool> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read status file {:?}", self.path))?;

        let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();
        let replaced = replace_status_line(&mut lines, &self.prefix, timestamp);

        std::fs::write(&self.path, lines.concat())
            .with_context(|| format!("Failed to write status file {:?}", self.path))?;

        if replaced {
            info!("{:?}: {} {}", self.path, self.prefix, timestamp);
        } else {
            warn!("{:?}: no line starts with {:?}", self.path, self.prefix);
        }
        Ok(replaced)
    }
}

/// Replace the first line starting with `prefix` by `"<prefix> <timestamp>\n"`.
pub fn replace_status_line(lines: &mut [String], prefix: &str, timestamp: &str) -> bool {
    match lines.iter_mut().find(|line| line.starts_with(prefix)) {
        Some(line) => {
            *line = format!("{} {}\n", prefix, timestamp);
            true
        }
        None => false,
    }
}
