//! Step through flagged frames.
//!
//! The list is scanned in stored order, not numeric order: the first stored
//! entry past the current frame wins, even when a numerically closer entry
//! appears later in the list.

use std::path::Path;

use posefix_common::PosefixResult;
use posefix_pose_model::{index_list_path, AnomalyIndexList};

use crate::stats::round_half_even;

/// Next flagged frame and how far through the list it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextFlagged {
    pub frame: usize,
    /// `round(position / len * 100)`, ties to even.
    pub percent_complete: u32,
}

/// First entry in stored order strictly greater than `current_frame`.
///
/// Returns `None` when no entry lies past `current_frame`.
pub fn next_flagged(list: &AnomalyIndexList, current_frame: usize) -> Option<NextFlagged> {
    let total = list.len();
    list.frames()
        .iter()
        .position(|&frame| frame > current_frame)
        .map(|position| NextFlagged {
            frame: list.frames()[position],
            percent_complete: round_half_even(position as f64 / total as f64 * 100.0) as u32,
        })
}

/// Load the index list belonging to `store_path` and find the next flagged frame.
pub fn next_flagged_for_store(
    store_path: &Path,
    current_frame: usize,
    model_marker: &str,
) -> PosefixResult<Option<NextFlagged>> {
    let list_path = index_list_path(store_path, model_marker);
    let list = AnomalyIndexList::load(&list_path)?;
    let next = next_flagged(&list, current_frame);
    match next {
        Some(n) => tracing::debug!(
            current_frame,
            next = n.frame,
            percent = n.percent_complete,
            "Next flagged frame"
        ),
        None => tracing::debug!(current_frame, "No flagged frames past current frame"),
    }
    Ok(next)
}

/// Clamp a requested frame to the last frame of a video with `frame_count` frames.
pub fn clamp_to_last_frame(frame: usize, frame_count: usize) -> usize {
    frame.min(frame_count.saturating_sub(1))
}

/// Default distance of a relative jump.
pub const DEFAULT_JUMP: usize = 15;

/// Move `offset` frames from `current`, staying within the video.
pub fn jump_frame(current: usize, offset: i64, frame_count: usize) -> usize {
    let target = if offset < 0 {
        current.saturating_sub(offset.unsigned_abs() as usize)
    } else {
        current.saturating_add(offset as usize)
    };
    clamp_to_last_frame(target, frame_count)
}
