//! Geometric per-frame signals derived from a coordinate table.

use std::f64::consts::PI;

use posefix_common::PosefixResult;
use posefix_pose_model::{CoordinateTable, Point2D};

pub const NOSE: &str = "Nose";
pub const LEFT_MID_WAIST: &str = "leftMidWaist";
pub const RIGHT_MID_WAIST: &str = "rightMidWaist";

/// Body area of `individual` per frame, modelling the silhouette as an ellipse.
///
/// The ellipse is centered between the two mid-waist points. One semi-axis
/// runs from the center to the nose, the other from the center to the left
/// mid-waist point.
pub fn animal_area(table: &CoordinateTable, individual: &str) -> PosefixResult<Vec<f64>> {
    let nose = table.series(individual, NOSE)?;
    let left_mid = table.series(individual, LEFT_MID_WAIST)?;
    let right_mid = table.series(individual, RIGHT_MID_WAIST)?;

    Ok(nose
        .iter()
        .zip(&left_mid)
        .zip(&right_mid)
        .map(|((nose, left), right)| {
            let center = Point2D::midpoint(left, right);
            let a = nose.distance_to(&center);
            let b = center.distance_to(left);
            PI * a * b
        })
        .collect())
}

/// Euclidean distance between two bodyparts of `individual` per frame.
pub fn bodypart_distance(
    table: &CoordinateTable,
    individual: &str,
    part_a: &str,
    part_b: &str,
) -> PosefixResult<Vec<f64>> {
    let a = table.series(individual, part_a)?;
    let b = table.series(individual, part_b)?;
    Ok(a.iter().zip(&b).map(|(a, b)| a.distance_to(b)).collect())
}
