//! Write manually corrected points back to the store.

use std::path::PathBuf;

use posefix_label_editor::LabelEditor;
use posefix_pose_model::PointMap;

use crate::ui;

pub fn run(store: PathBuf, frame: usize, points: PathBuf, scale: f64) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&points)
        .map_err(|_| anyhow::anyhow!("Points file not found: {}", points.display()))?;
    let edited: PointMap = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse points: {e}"))?;

    let editor = LabelEditor::open(store);
    let table = editor
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;

    editor
        .apply_manual_edit(&table, &edited, frame, scale)
        .map_err(|e| ui::edit_failed("Edit", e))?;

    println!("Updated frame {frame} at scale {scale}.");
    Ok(())
}
