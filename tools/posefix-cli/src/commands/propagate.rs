//! Copy correctly tracked labels onto neighbouring frames.

use std::path::PathBuf;

use posefix_label_editor::{propagation_range, Direction, LabelEditor, PropagationTarget};

use crate::ui;

pub fn run(
    store: PathBuf,
    frame: usize,
    direction: String,
    steps: Option<usize>,
    target: String,
) -> anyhow::Result<()> {
    let direction: Direction = direction.parse()?;
    let target: PropagationTarget = target.parse()?;
    let steps = match direction {
        Direction::Forward => ui::forward_steps(steps),
        Direction::Backward => ui::backward_steps(steps),
    };

    let editor = LabelEditor::open(store);
    let table = editor
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;

    editor
        .propagate(&table, frame, direction, steps, &target)
        .map_err(|e| ui::edit_failed("Propagation", e))?;

    let range = propagation_range(frame, direction, steps)?;
    if range.is_empty() {
        println!("Nothing to propagate from frame {frame}.");
    } else {
        println!(
            "Copied frame {frame} onto frames {}..{}.",
            range.start, range.end
        );
    }
    Ok(())
}
