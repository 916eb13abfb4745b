//! Conversions from what a reviewer types to what the editing layer takes.

use posefix_common::{PosefixError, PosefixResult};
use posefix_label_editor::IndividualPair;

/// Exclusive end of a sequence swap whose last frame the reviewer marked as `to`.
///
/// Marking the video's last frame keeps it as the exclusive end, so that
/// frame itself is not swapped.
pub fn sequence_end(to: usize, frame_count: usize) -> PosefixResult<usize> {
    let next = to.checked_add(1).ok_or_else(|| {
        PosefixError::invalid_range(format!("frame {to} outside [0, {frame_count})"))
    })?;
    Ok(if next == frame_count { to } else { next })
}

/// Steps for a forward propagation. An omitted count means one frame; a
/// count of one is raised to two so the frame after the reference is written.
pub fn forward_steps(requested: Option<usize>) -> usize {
    match requested.unwrap_or(1) {
        1 => 2,
        n => n,
    }
}

/// Steps for a backward propagation. An omitted count means one frame.
pub fn backward_steps(requested: Option<usize>) -> usize {
    requested.unwrap_or(1)
}

pub fn parse_pair(pair: Option<Vec<String>>) -> anyhow::Result<Option<IndividualPair>> {
    match pair.as_deref() {
        None => Ok(None),
        Some([first, second]) => Ok(Some(IndividualPair::new(first.clone(), second.clone()))),
        Some(other) => anyhow::bail!("--pair takes two individuals, got {}", other.len()),
    }
}

/// Context for a rejected edit. Edits rejected for their data never touch the store.
pub fn edit_failed(action: &str, e: PosefixError) -> anyhow::Error {
    if e.is_data_error() {
        anyhow::anyhow!("{action} rejected, store unchanged: {e}")
    } else {
        anyhow::anyhow!("{action} failed: {e}")
    }
}
