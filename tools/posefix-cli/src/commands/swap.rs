//! Swap mis-assigned individuals.

use std::path::PathBuf;

use posefix_label_editor::LabelEditor;

use crate::ui;

pub fn run(store: PathBuf, frame: usize, pair: Option<Vec<String>>) -> anyhow::Result<()> {
    let pair = ui::parse_pair(pair)?;
    let editor = LabelEditor::open(store);
    let table = editor
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;

    editor
        .swap_frame(&table, frame, pair.as_ref())
        .map_err(|e| ui::edit_failed("Swap", e))?;

    println!("Swapped labels at frame {frame}.");
    Ok(())
}

pub fn run_sequence(
    store: PathBuf,
    from: usize,
    to: usize,
    pair: Option<Vec<String>>,
) -> anyhow::Result<()> {
    let pair = ui::parse_pair(pair)?;
    let editor = LabelEditor::open(store);
    let table = editor
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;

    let end = ui::sequence_end(to, table.frame_count())
        .map_err(|e| ui::edit_failed("Sequence swap", e))?;
    editor
        .swap_sequence(&table, from..end, pair.as_ref())
        .map_err(|e| ui::edit_failed("Sequence swap", e))?;

    println!("Swapped labels on frames {from}..{end} ({} frames).", end.saturating_sub(from));
    Ok(())
}
