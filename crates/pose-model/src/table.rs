//! The coordinate table: tracked `(x, y)` positions for every frame,
//! individual, and bodypart.
//!
//! Points are stored frame-major, then by individual, then by bodypart, so
//! the positions of one individual at one frame form a contiguous slice.
//! Every individual shares the same bodypart set and every frame carries a
//! point for every `(individual, bodypart)` pair; both are enforced at
//! construction and preserved by every mutation.

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use posefix_common::{PosefixError, PosefixResult};

use crate::point::{Point2D, PointMap};

/// Store key used when the source format has none.
pub const DEFAULT_STORE_KEY: &str = "df_with_missing";

/// In-memory working copy of a persisted coordinate table.
#[derive(Debug, Clone)]
pub struct CoordinateTable {
    key: String,
    scorer: String,
    individuals: Vec<String>,
    bodyparts: Vec<String>,
    points: Vec<Point2D>,
}

impl CoordinateTable {
    /// Create a table of `frame_count` frames with every point missing.
    pub fn new(
        key: impl Into<String>,
        scorer: impl Into<String>,
        individuals: Vec<String>,
        bodyparts: Vec<String>,
        frame_count: usize,
    ) -> PosefixResult<Self> {
        let stride = individuals.len() * bodyparts.len();
        Self::from_points(
            key,
            scorer,
            individuals,
            bodyparts,
            vec![Point2D::MISSING; stride * frame_count],
        )
    }

    /// Build a table from points laid out frame-major, then individual, then bodypart.
    pub fn from_points(
        key: impl Into<String>,
        scorer: impl Into<String>,
        individuals: Vec<String>,
        bodyparts: Vec<String>,
        points: Vec<Point2D>,
    ) -> PosefixResult<Self> {
        let scorer = scorer.into();
        if scorer.is_empty() {
            return Err(PosefixError::missing_data("table has no scorer label"));
        }
        check_labels("individual", &individuals)?;
        check_labels("bodypart", &bodyparts)?;

        let stride = individuals.len() * bodyparts.len();
        if points.len() % stride != 0 {
            return Err(PosefixError::malformed(format!(
                "{} points do not fill whole frames of {} individuals x {} bodyparts",
                points.len(),
                individuals.len(),
                bodyparts.len()
            )));
        }

        Ok(Self {
            key: key.into(),
            scorer,
            individuals,
            bodyparts,
            points,
        })
    }

    /// Store key the table was loaded from and is written back under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn scorer(&self) -> &str {
        &self.scorer
    }

    /// Individuals in column order.
    pub fn individuals(&self) -> &[String] {
        &self.individuals
    }

    /// Bodyparts in column order, shared by every individual.
    pub fn bodyparts(&self) -> &[String] {
        &self.bodyparts
    }

    pub fn frame_count(&self) -> usize {
        self.points.len() / self.stride()
    }

    /// All points, frame-major, then individual, then bodypart.
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    fn stride(&self) -> usize {
        self.individuals.len() * self.bodyparts.len()
    }

    fn offset(&self, frame: usize, individual: usize, bodypart: usize) -> usize {
        frame * self.stride() + individual * self.bodyparts.len() + bodypart
    }

    /// Column position of an individual.
    pub fn individual_index(&self, name: &str) -> PosefixResult<usize> {
        self.individuals
            .iter()
            .position(|i| i == name)
            .ok_or_else(|| {
                PosefixError::missing_data(format!(
                    "individual '{name}' not in table (scorer '{}')",
                    self.scorer
                ))
            })
    }

    /// Column position of a bodypart.
    pub fn bodypart_index(&self, name: &str) -> PosefixResult<usize> {
        self.bodyparts
            .iter()
            .position(|b| b == name)
            .ok_or_else(|| {
                PosefixError::missing_data(format!(
                    "bodypart '{name}' not in table (scorer '{}')",
                    self.scorer
                ))
            })
    }

    pub fn check_frame(&self, frame: usize) -> PosefixResult<()> {
        if frame >= self.frame_count() {
            return Err(PosefixError::invalid_range(format!(
                "frame {frame} outside [0, {})",
                self.frame_count()
            )));
        }
        Ok(())
    }

    /// Check that a half-open frame range lies within the table.
    pub fn check_range(&self, range: &Range<usize>) -> PosefixResult<()> {
        if range.start > range.end || range.end > self.frame_count() {
            return Err(PosefixError::invalid_range(format!(
                "frames [{}, {}) outside [0, {})",
                range.start,
                range.end,
                self.frame_count()
            )));
        }
        Ok(())
    }

    /// Position of one bodypart of one individual at one frame.
    pub fn get(&self, frame: usize, individual: &str, bodypart: &str) -> PosefixResult<Point2D> {
        self.check_frame(frame)?;
        let i = self.individual_index(individual)?;
        let b = self.bodypart_index(bodypart)?;
        Ok(self.points[self.offset(frame, i, b)])
    }

    /// Overwrite one bodypart of one individual at one frame.
    pub fn set(
        &mut self,
        frame: usize,
        individual: &str,
        bodypart: &str,
        point: Point2D,
    ) -> PosefixResult<()> {
        self.check_frame(frame)?;
        let i = self.individual_index(individual)?;
        let b = self.bodypart_index(bodypart)?;
        let offset = self.offset(frame, i, b);
        self.points[offset] = point;
        Ok(())
    }

    /// Per-frame positions of one bodypart of one individual.
    pub fn series(&self, individual: &str, bodypart: &str) -> PosefixResult<Vec<Point2D>> {
        let i = self.individual_index(individual)?;
        let b = self.bodypart_index(bodypart)?;
        Ok((0..self.frame_count())
            .map(|frame| self.points[self.offset(frame, i, b)])
            .collect())
    }

    /// All bodypart positions of the individual at column `individual` in `frame`.
    ///
    /// # Panics
    ///
    /// Panics if `frame` or `individual` is out of bounds.
    pub fn individual_at(&self, frame: usize, individual: usize) -> &[Point2D] {
        let start = self.offset(frame, individual, 0);
        &self.points[start..start + self.bodyparts.len()]
    }

    /// Exchange the full coordinate vectors of two individuals at one frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame`, `a`, or `b` is out of bounds.
    pub fn swap_individuals_at(&mut self, frame: usize, a: usize, b: usize) {
        if a == b {
            return;
        }
        let a_start = self.offset(frame, a, 0);
        let b_start = self.offset(frame, b, 0);
        for k in 0..self.bodyparts.len() {
            self.points.swap(a_start + k, b_start + k);
        }
    }

    /// Copy one individual's coordinate vector from frame `src` to frame `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `individual`, `src`, or `dst` is out of bounds.
    pub fn copy_individual_frame(&mut self, individual: usize, src: usize, dst: usize) {
        let src_start = self.offset(src, individual, 0);
        let dst_start = self.offset(dst, individual, 0);
        let len = self.bodyparts.len();
        self.points
            .copy_within(src_start..src_start + len, dst_start);
    }

    /// Bodypart positions of every individual at `frame`, multiplied by
    /// `scale_factor` for display.
    pub fn frame_points(&self, frame: usize, scale_factor: f64) -> PosefixResult<PointMap> {
        self.check_frame(frame)?;
        let mut map = PointMap::new();
        for (i, individual) in self.individuals.iter().enumerate() {
            let parts: BTreeMap<String, Point2D> = self
                .bodyparts
                .iter()
                .zip(self.individual_at(frame, i))
                .map(|(bodypart, point)| (bodypart.clone(), point.scaled(scale_factor)))
                .collect();
            map.insert(individual.clone(), parts);
        }
        Ok(map)
    }

    /// Number of points with a missing component.
    pub fn missing_points(&self) -> usize {
        self.points.iter().filter(|p| p.is_missing()).count()
    }

    /// Report structural issues a reviewer should know about.
    ///
    /// `expected_frames` is the frame count of the source video, when known.
    pub fn validate(&self, expected_frames: Option<usize>) -> Vec<String> {
        let mut issues = vec![];

        if self.frame_count() == 0 {
            issues.push("Table has no frames".to_string());
        }

        if let Some(expected) = expected_frames {
            if expected != self.frame_count() {
                issues.push(format!(
                    "Frame count {} does not match video frame count {expected}",
                    self.frame_count()
                ));
            }
        }

        for (i, individual) in self.individuals.iter().enumerate() {
            for (b, bodypart) in self.bodyparts.iter().enumerate() {
                let missing = (0..self.frame_count())
                    .filter(|&f| self.points[self.offset(f, i, b)].is_missing())
                    .count();
                if missing > 0 {
                    issues.push(format!(
                        "{individual}/{bodypart}: {missing} frame(s) without a position"
                    ));
                }
            }
        }

        issues
    }

    /// Label-aware equality that treats missing points as equal.
    pub fn same_as(&self, other: &CoordinateTable) -> bool {
        self.key == other.key
            && self.scorer == other.scorer
            && self.individuals == other.individuals
            && self.bodyparts == other.bodyparts
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.same_as(b))
    }
}

fn check_labels(kind: &str, labels: &[String]) -> PosefixResult<()> {
    if labels.is_empty() {
        return Err(PosefixError::missing_data(format!("table has no {kind} labels")));
    }
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(PosefixError::malformed(format!(
                "duplicate {kind} label '{label}'"
            )));
        }
    }
    Ok(())
}
