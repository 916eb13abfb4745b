//! Persisted lists of suspect frame indices.
//!
//! An index list belongs to exactly one coordinate store. Its path is
//! derived from the store path: same directory, file stem cut at the model
//! identifier marker, then [`INDEX_LIST_SUFFIX`]. The list is written
//! wholesale by detection and only read afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use posefix_common::{PosefixError, PosefixResult};

/// Suffix appended to the truncated store stem.
pub const INDEX_LIST_SUFFIX: &str = "bad_tracking.json";

/// Frame indices flagged by detection, in detection order.
///
/// The same frame may appear more than once when several checks or
/// several individuals flag it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnomalyIndexList {
    frames: Vec<usize>,
}

impl AnomalyIndexList {
    pub fn new(frames: Vec<usize>) -> Self {
        Self { frames }
    }

    /// Indices in stored order.
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Distinct indices in ascending order.
    pub fn sorted_unique(&self) -> Vec<usize> {
        let mut frames = self.frames.clone();
        frames.sort_unstable();
        frames.dedup();
        frames
    }

    /// Load a list written by [`AnomalyIndexList::save`].
    pub fn load(path: impl AsRef<Path>) -> PosefixResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PosefixError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| PosefixError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Replace the list file with this list.
    pub fn save(&self, path: impl AsRef<Path>) -> PosefixResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json).map_err(|e| PosefixError::io(path, e))
    }
}

/// Path of the index list that belongs to `store_path`.
///
/// `"/data/mouse12DLC_CNN_resnet50.json"` with marker `"CNN"` becomes
/// `"/data/mouse12DLC_bad_tracking.json"`. When the marker is absent the
/// whole stem is kept.
pub fn index_list_path(store_path: &Path, model_marker: &str) -> PathBuf {
    let stem = store_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = match stem.find(model_marker) {
        Some(at) if !model_marker.is_empty() => &stem[..at],
        _ => stem.as_str(),
    };
    let name = format!("{prefix}{INDEX_LIST_SUFFIX}");
    match store_path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
