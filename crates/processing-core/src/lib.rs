//! PoseFix Processing Core: tracking anomaly detection
//!
//! Flags frames where tracked geometry is implausible:
//! - **Features:** Per-frame body area and bodypart distances
//! - **Stats:** NaN-skipping median, mean, and deviation helpers
//! - **Outliers:** Robust band rules over each feature, per individual
//! - **Navigator:** Step through persisted flagged frames
//!
//! Detection and navigation read stores and write only the index list.

pub mod features;
pub mod navigator;
pub mod outlier;
pub mod stats;

pub use navigator::{next_flagged, NextFlagged};
pub use outlier::{detect_anomalies, OutlierDetector};
