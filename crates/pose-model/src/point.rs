//! Point types for tracked bodypart positions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A 2D position in pixels.
///
/// `NaN` components mark a bodypart that was not detected in a frame.
/// Missing components serialize as JSON `null` and read back as `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    #[serde(with = "nullable")]
    pub x: f64,
    #[serde(with = "nullable")]
    pub y: f64,
}

impl Point2D {
    /// A point with both components missing.
    pub const MISSING: Point2D = Point2D {
        x: f64::NAN,
        y: f64::NAN,
    };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point halfway between two points.
    pub fn midpoint(a: &Point2D, b: &Point2D) -> Point2D {
        Point2D {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }

    /// Multiply both components by `factor`.
    pub fn scaled(&self, factor: f64) -> Point2D {
        Point2D {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Integer pixel position as drawn by the display layer (truncates toward zero).
    ///
    /// Returns `None` for missing points.
    pub fn truncated(&self) -> Option<(i64, i64)> {
        if self.is_missing() {
            return None;
        }
        Some((self.x.trunc() as i64, self.y.trunc() as i64))
    }

    pub fn is_missing(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Component-wise equality that treats two `NaN`s as equal.
    pub fn same_as(&self, other: &Point2D) -> bool {
        let eq = |a: f64, b: f64| a == b || (a.is_nan() && b.is_nan());
        eq(self.x, other.x) && eq(self.y, other.y)
    }
}

mod nullable {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

/// Bodypart positions of every individual at one frame:
/// `individual -> bodypart -> point`.
pub type PointMap = BTreeMap<String, BTreeMap<String, Point2D>>;
