//! Store-backed label editing.

use std::ops::Range;
use std::path::{Path, PathBuf};

use posefix_common::PosefixResult;
use posefix_pose_model::{load_table, save_table, CoordinateTable, PointMap};

use crate::edit::{self, Direction, IndividualPair, PropagationTarget};

/// Applies label edits to one coordinate store.
///
/// Each edit works on a copy of the caller's table. The copy is written back
/// to the store only if the edit succeeds, and is returned so the caller can
/// keep working without reloading.
#[derive(Debug, Clone)]
pub struct LabelEditor {
    store_path: PathBuf,
}

impl LabelEditor {
    pub fn open(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Read the current table from the store.
    pub fn load(&self) -> PosefixResult<CoordinateTable> {
        load_table(&self.store_path)
    }

    /// Swap two individuals at one frame. `pair` defaults to the first two
    /// individuals.
    pub fn swap_frame(
        &self,
        table: &CoordinateTable,
        frame: usize,
        pair: Option<&IndividualPair>,
    ) -> PosefixResult<CoordinateTable> {
        let pair = resolve_pair(table, pair)?;
        let mut edited = table.clone();
        edit::swap_frame(&mut edited, frame, &pair)?;
        self.persist(&edited)?;

        tracing::info!(
            store = %self.store_path.display(),
            frame,
            first = %pair.first,
            second = %pair.second,
            "Swapped individuals"
        );
        Ok(edited)
    }

    /// Swap two individuals on every frame of the half-open range `frames`.
    pub fn swap_sequence(
        &self,
        table: &CoordinateTable,
        frames: Range<usize>,
        pair: Option<&IndividualPair>,
    ) -> PosefixResult<CoordinateTable> {
        let pair = resolve_pair(table, pair)?;
        let mut edited = table.clone();
        edit::swap_sequence(&mut edited, frames.clone(), &pair)?;
        self.persist(&edited)?;

        tracing::info!(
            store = %self.store_path.display(),
            start = frames.start,
            end = frames.end,
            first = %pair.first,
            second = %pair.second,
            "Swapped individuals over sequence"
        );
        Ok(edited)
    }

    /// Copy `from_frame` over neighbouring frames. See [`edit::propagation_range`].
    pub fn propagate(
        &self,
        table: &CoordinateTable,
        from_frame: usize,
        direction: Direction,
        steps: usize,
        target: &PropagationTarget,
    ) -> PosefixResult<CoordinateTable> {
        let mut edited = table.clone();
        let range = edit::propagate(&mut edited, from_frame, direction, steps, target)?;
        self.persist(&edited)?;

        tracing::info!(
            store = %self.store_path.display(),
            from_frame,
            ?direction,
            ?target,
            start = range.start,
            end = range.end,
            "Propagated labels"
        );
        Ok(edited)
    }

    /// Overwrite `frame` with display-space points divided by `scale_factor`.
    pub fn apply_manual_edit(
        &self,
        table: &CoordinateTable,
        points: &PointMap,
        frame: usize,
        scale_factor: f64,
    ) -> PosefixResult<CoordinateTable> {
        let mut edited = table.clone();
        edit::apply_manual_edit(&mut edited, points, frame, scale_factor)?;
        self.persist(&edited)?;

        tracing::info!(
            store = %self.store_path.display(),
            frame,
            scale_factor,
            "Applied manual edit"
        );
        Ok(edited)
    }

    fn persist(&self, table: &CoordinateTable) -> PosefixResult<()> {
        save_table(table, &self.store_path)
    }
}

fn resolve_pair(
    table: &CoordinateTable,
    pair: Option<&IndividualPair>,
) -> PosefixResult<IndividualPair> {
    match pair {
        Some(pair) => Ok(pair.clone()),
        None => IndividualPair::first_two(table),
    }
}
