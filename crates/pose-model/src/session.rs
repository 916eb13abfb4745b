//! Review progress across sessions.
//!
//! Remembers the last frame reviewed in each video so a reviewer can resume
//! where they stopped. Entries are keyed by video name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use posefix_common::{PosefixError, PosefixResult};

/// Last reviewed frame of one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub frame: usize,
    /// When the entry was last written (ISO 8601).
    pub updated_at: String,
}

/// Session progress file contents.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
    entries: BTreeMap<String, SessionEntry>,
}

impl SessionLog {
    /// Load the log at `path`; a missing file yields an empty log.
    pub fn load(path: impl AsRef<Path>) -> PosefixResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| PosefixError::io(&path, e))?;
            serde_json::from_str(&content).map_err(|e| PosefixError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Remember `frame` as the last reviewed frame of `video`.
    pub fn record(&mut self, video: impl Into<String>, frame: usize) {
        self.entries.insert(
            video.into(),
            SessionEntry {
                frame,
                updated_at: chrono::Utc::now().to_rfc3339(),
            },
        );
    }

    pub fn last_frame(&self, video: &str) -> Option<usize> {
        self.entries.get(video).map(|e| e.frame)
    }

    pub fn entries(&self) -> &BTreeMap<String, SessionEntry> {
        &self.entries
    }

    pub fn save(&self) -> PosefixResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PosefixError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json).map_err(|e| PosefixError::io(&self.path, e))
    }
}
