//! Navigate between frames.

use std::path::PathBuf;

use posefix_common::AppConfig;
use posefix_pose_model::load_table;
use posefix_processing_core::navigator::{clamp_to_last_frame, jump_frame, next_flagged_for_store};

pub fn run(store: PathBuf, frame: usize, config: &AppConfig) -> anyhow::Result<()> {
    let next = next_flagged_for_store(&store, frame, &config.detection.model_marker)
        .map_err(|e| anyhow::anyhow!("Failed to read bad tracking indices: {e}"))?;

    match next {
        Some(next) => {
            let table =
                load_table(&store).map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;
            println!(
                "Next flagged frame: {} ({}% through the list)",
                clamp_to_last_frame(next.frame, table.frame_count()),
                next.percent_complete
            );
        }
        None => println!("No flagged frames after frame {frame}."),
    }

    Ok(())
}

pub fn jump(store: PathBuf, frame: usize, by: usize, back: bool) -> anyhow::Result<()> {
    let table = load_table(&store).map_err(|e| anyhow::anyhow!("Failed to load store: {e}"))?;
    let offset = i64::try_from(by)?;
    let target = jump_frame(frame, if back { -offset } else { offset }, table.frame_count());
    println!("Frame: {target} / {}", table.frame_count().saturating_sub(1));
    Ok(())
}
