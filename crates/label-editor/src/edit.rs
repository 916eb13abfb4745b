//! In-memory label edits on a coordinate table.
//!
//! Each function validates its arguments first and touches the table only
//! once validation has passed, so an error leaves the table unchanged.

use std::ops::Range;
use std::str::FromStr;

use posefix_common::{PosefixError, PosefixResult};
use posefix_pose_model::{CoordinateTable, Point2D, PointMap};

/// The two individuals whose labels are exchanged by a swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualPair {
    pub first: String,
    pub second: String,
}

impl IndividualPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// The first two individuals in column order.
    pub fn first_two(table: &CoordinateTable) -> PosefixResult<Self> {
        match table.individuals() {
            [first, second, ..] => Ok(Self::new(first.clone(), second.clone())),
            _ => Err(PosefixError::invalid_range(format!(
                "swapping needs two individuals, table has {}",
                table.individuals().len()
            ))),
        }
    }

    /// Column positions of both individuals.
    fn resolve(&self, table: &CoordinateTable) -> PosefixResult<(usize, usize)> {
        if self.first == self.second {
            return Err(PosefixError::invalid_range(format!(
                "cannot swap '{}' with itself",
                self.first
            )));
        }
        Ok((
            table.individual_index(&self.first)?,
            table.individual_index(&self.second)?,
        ))
    }
}

/// Direction of propagation from the reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl FromStr for Direction {
    type Err = PosefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            other => Err(PosefixError::malformed(format!(
                "direction must be 'forward' or 'backward', got '{other}'"
            ))),
        }
    }
}

/// Which individuals a propagation rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropagationTarget {
    /// Every individual (`"both"` on the command line).
    All,
    Individual(String),
}

impl FromStr for PropagationTarget {
    type Err = PosefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(PosefixError::malformed("empty propagation target")),
            "both" | "all" => Ok(Self::All),
            name => Ok(Self::Individual(name.to_string())),
        }
    }
}

/// Frames rewritten when propagating from `from_frame`.
///
/// Backward covers `[from - steps, from)`. Forward covers
/// `[from + 1, from + steps)`, so `steps = 1` forward is empty.
pub fn propagation_range(from_frame: usize, direction: Direction, steps: usize) -> PosefixResult<Range<usize>> {
    match direction {
        Direction::Backward => {
            let start = from_frame.checked_sub(steps).ok_or_else(|| {
                PosefixError::invalid_range(format!(
                    "cannot propagate {steps} frame(s) back from frame {from_frame}"
                ))
            })?;
            Ok(start..from_frame)
        }
        Direction::Forward => {
            let overflow = || {
                PosefixError::invalid_range(format!(
                    "cannot propagate {steps} frame(s) forward from frame {from_frame}"
                ))
            };
            let start = from_frame.checked_add(1).ok_or_else(overflow)?;
            let end = from_frame.checked_add(steps).ok_or_else(overflow)?.max(start);
            Ok(start..end)
        }
    }
}

/// Exchange two individuals' coordinates at one frame.
pub fn swap_frame(
    table: &mut CoordinateTable,
    frame: usize,
    pair: &IndividualPair,
) -> PosefixResult<()> {
    table.check_frame(frame)?;
    let (a, b) = pair.resolve(table)?;
    table.swap_individuals_at(frame, a, b);
    Ok(())
}

/// Exchange two individuals' coordinates on every frame of `frames`.
pub fn swap_sequence(
    table: &mut CoordinateTable,
    frames: Range<usize>,
    pair: &IndividualPair,
) -> PosefixResult<()> {
    table.check_range(&frames)?;
    let (a, b) = pair.resolve(table)?;
    for frame in frames {
        table.swap_individuals_at(frame, a, b);
    }
    Ok(())
}

/// Copy the coordinates at `from_frame` over neighbouring frames.
///
/// Returns the rewritten frame range.
pub fn propagate(
    table: &mut CoordinateTable,
    from_frame: usize,
    direction: Direction,
    steps: usize,
    target: &PropagationTarget,
) -> PosefixResult<Range<usize>> {
    table.check_frame(from_frame)?;
    let range = propagation_range(from_frame, direction, steps)?;
    table.check_range(&range)?;

    let individuals = match target {
        PropagationTarget::All => (0..table.individuals().len()).collect(),
        PropagationTarget::Individual(name) => vec![table.individual_index(name)?],
    };

    for individual in individuals {
        for frame in range.clone() {
            table.copy_individual_frame(individual, from_frame, frame);
        }
    }
    Ok(range)
}

/// Overwrite every point at `frame` with display-space positions divided
/// by `scale_factor`.
///
/// `points` must hold a position for every individual and bodypart of the
/// table, and nothing else.
pub fn apply_manual_edit(
    table: &mut CoordinateTable,
    points: &PointMap,
    frame: usize,
    scale_factor: f64,
) -> PosefixResult<()> {
    table.check_frame(frame)?;
    if scale_factor <= 0.0 || !scale_factor.is_finite() {
        return Err(PosefixError::invalid_range(format!(
            "scale factor must be positive, got {scale_factor}"
        )));
    }

    for (individual, parts) in points {
        table.individual_index(individual)?;
        for bodypart in parts.keys() {
            table.bodypart_index(bodypart)?;
        }
    }

    let mut updates: Vec<(String, String, Point2D)> = Vec::new();
    for individual in table.individuals() {
        let parts = points.get(individual).ok_or_else(|| {
            PosefixError::missing_data(format!("no edited points for individual '{individual}'"))
        })?;
        for bodypart in table.bodyparts() {
            let point = parts.get(bodypart).ok_or_else(|| {
                PosefixError::missing_data(format!(
                    "no edited point for {individual}/{bodypart}"
                ))
            })?;
            updates.push((
                individual.clone(),
                bodypart.clone(),
                Point2D::new(point.x / scale_factor, point.y / scale_factor),
            ));
        }
    }

    for (individual, bodypart, point) in updates {
        table.set(frame, &individual, &bodypart, point)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(individuals: &[&str], frames: usize) -> CoordinateTable {
        let mut table = CoordinateTable::new(
            "k",
            "scorer",
            individuals.iter().map(|s| s.to_string()).collect(),
            vec!["Nose".to_string(), "tailStart".to_string()],
            frames,
        )
        .unwrap();
        for frame in 0..frames {
            for (i, ind) in individuals.iter().enumerate() {
                let base = (i * 100 + frame) as f64;
                table.set(frame, ind, "Nose", Point2D::new(base, base + 0.5)).unwrap();
                table
                    .set(frame, ind, "tailStart", Point2D::new(-base, base * 2.0))
                    .unwrap();
            }
        }
        table
    }

    #[test]
    fn test_first_two_needs_two_individuals() {
        let single = table(&["ind1"], 3);
        let err = IndividualPair::first_two(&single).unwrap_err();
        assert!(matches!(err, PosefixError::InvalidRange { .. }));

        let triple = table(&["a", "b", "c"], 3);
        assert_eq!(
            IndividualPair::first_two(&triple).unwrap(),
            IndividualPair::new("a", "b")
        );
    }

    #[test]
    fn test_swap_frame_exchanges_all_bodyparts() {
        let mut t = table(&["ind1", "ind2"], 4);
        let before = t.clone();
        swap_frame(&mut t, 2, &IndividualPair::first_two(&before).unwrap()).unwrap();

        assert_eq!(t.individual_at(2, 0), before.individual_at(2, 1));
        assert_eq!(t.individual_at(2, 1), before.individual_at(2, 0));
        assert_eq!(t.individual_at(1, 0), before.individual_at(1, 0));
    }

    #[test]
    fn test_swap_explicit_pair_leaves_others() {
        let mut t = table(&["a", "b", "c"], 2);
        let before = t.clone();
        swap_frame(&mut t, 0, &IndividualPair::new("c", "a")).unwrap();

        assert_eq!(t.individual_at(0, 0), before.individual_at(0, 2));
        assert_eq!(t.individual_at(0, 2), before.individual_at(0, 0));
        assert_eq!(t.individual_at(0, 1), before.individual_at(0, 1));
    }

    #[test]
    fn test_swap_with_self_rejected() {
        let mut t = table(&["ind1", "ind2"], 2);
        let err = swap_frame(&mut t, 0, &IndividualPair::new("ind1", "ind1")).unwrap_err();
        assert!(matches!(err, PosefixError::InvalidRange { .. }));
    }

    #[test]
    fn test_swap_sequence_out_of_range_leaves_table() {
        let mut t = table(&["ind1", "ind2"], 5);
        let before = t.clone();
        let pair = IndividualPair::first_two(&before).unwrap();
        assert!(swap_sequence(&mut t, 3..6, &pair).is_err());
        assert!(t.same_as(&before));
    }

    #[test]
    fn test_propagation_ranges() {
        assert_eq!(propagation_range(10, Direction::Backward, 3).unwrap(), 7..10);
        assert_eq!(propagation_range(10, Direction::Forward, 3).unwrap(), 11..13);
        assert!(propagation_range(10, Direction::Forward, 1).unwrap().is_empty());
        assert!(propagation_range(10, Direction::Forward, 0).unwrap().is_empty());
        assert!(propagation_range(2, Direction::Backward, 3).is_err());
    }

    #[test]
    fn test_forward_range_overflow_is_invalid_range() {
        let err = propagation_range(4, Direction::Forward, usize::MAX).unwrap_err();
        assert!(matches!(err, PosefixError::InvalidRange { .. }));
        assert!(propagation_range(usize::MAX, Direction::Forward, 0).is_err());
    }

    #[test]
    fn test_propagate_overflowing_steps_leaves_table() {
        let mut t = table(&["ind1", "ind2"], 6);
        let before = t.clone();
        let err = propagate(&mut t, 4, Direction::Forward, usize::MAX, &PropagationTarget::All)
            .unwrap_err();
        assert!(matches!(err, PosefixError::InvalidRange { .. }));
        assert!(t.same_as(&before));
    }

    #[test]
    fn test_propagate_backward_single_individual() {
        let mut t = table(&["ind1", "ind2"], 6);
        let before = t.clone();
        let range = propagate(
            &mut t,
            4,
            Direction::Backward,
            2,
            &PropagationTarget::Individual("ind2".to_string()),
        )
        .unwrap();

        assert_eq!(range, 2..4);
        for frame in 2..4 {
            assert_eq!(t.individual_at(frame, 1), before.individual_at(4, 1));
            assert_eq!(t.individual_at(frame, 0), before.individual_at(frame, 0));
        }
        assert_eq!(t.individual_at(1, 1), before.individual_at(1, 1));
    }

    #[test]
    fn test_propagate_forward_past_end_rejected() {
        let mut t = table(&["ind1", "ind2"], 6);
        let err = propagate(&mut t, 4, Direction::Forward, 3, &PropagationTarget::All)
            .unwrap_err();
        assert!(matches!(err, PosefixError::InvalidRange { .. }));
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("both".parse::<PropagationTarget>().unwrap(), PropagationTarget::All);
        assert_eq!(
            "ind2".parse::<PropagationTarget>().unwrap(),
            PropagationTarget::Individual("ind2".to_string())
        );
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_manual_edit_divides_by_scale() {
        let mut t = table(&["ind1", "ind2"], 3);
        let mut points = t.frame_points(1, 0.5).unwrap();
        points
            .get_mut("ind2")
            .unwrap()
            .insert("Nose".to_string(), Point2D::new(40.0, 21.0));

        apply_manual_edit(&mut t, &points, 1, 0.5).unwrap();
        assert_eq!(t.get(1, "ind2", "Nose").unwrap(), Point2D::new(80.0, 42.0));
        assert_eq!(t.get(1, "ind1", "Nose").unwrap(), Point2D::new(1.0, 1.5));
    }

    #[test]
    fn test_manual_edit_requires_every_point() {
        let mut t = table(&["ind1", "ind2"], 3);
        let before = t.clone();
        let mut points = t.frame_points(0, 1.0).unwrap();
        points.get_mut("ind1").unwrap().remove("tailStart");
        points
            .get_mut("ind2")
            .unwrap()
            .insert("Nose".to_string(), Point2D::new(0.0, 0.0));

        let err = apply_manual_edit(&mut t, &points, 0, 1.0).unwrap_err();
        assert!(matches!(err, PosefixError::MissingData { .. }));
        assert!(t.same_as(&before));
    }

    #[test]
    fn test_manual_edit_rejects_unknown_individual() {
        let mut t = table(&["ind1", "ind2"], 3);
        let mut points = t.frame_points(0, 1.0).unwrap();
        points.insert("ind9".to_string(), Default::default());

        let err = apply_manual_edit(&mut t, &points, 0, 1.0).unwrap_err();
        assert!(err.to_string().contains("ind9"));
    }
}
