//! Outlier detection over tracked geometry.
//!
//! # Algorithm
//!
//! For every individual, in table order:
//!
//! 1. **Area** check: flag frames whose ellipse area lies outside
//!    `median ± area_tolerance * median`.
//! 2. **Distance** checks: for each configured bodypart pair, flag frames
//!    whose distance lies outside `median ± mad_multiplier * mad`, where
//!    `mad = median(|d - mean(d)|)`.
//!
//! Each check yields ascending, distinct frame indices. The results are
//! concatenated in check order without de-duplicating across checks or
//! individuals, and written wholesale to the store's index list.

use std::path::{Path, PathBuf};

use posefix_common::{BodypartProbe, DetectionConfig, PosefixResult};
use posefix_pose_model::{index_list_path, load_table, AnomalyIndexList, CoordinateTable};

use crate::features::{animal_area, bodypart_distance, LEFT_MID_WAIST, NOSE, RIGHT_MID_WAIST};
use crate::stats::{mad_about_mean, median, outside_band};

/// Which signal a check examined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalKind {
    Area,
    Distance { from: String, to: String },
}

/// Outcome of one check for one individual.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub individual: String,
    pub signal: SignalKind,
    /// Center of the accepted band (`NaN` when the signal had no values).
    pub median: f64,
    /// Half-width of the accepted band.
    pub threshold: f64,
    /// Flagged frames, ascending and distinct.
    pub flagged: Vec<usize>,
}

/// All check results of one detection pass, in detection order.
#[derive(Debug, Clone, Default)]
pub struct DetectionReport {
    pub checks: Vec<CheckResult>,
}

impl DetectionReport {
    /// Flagged frames of every check, concatenated in detection order.
    pub fn index_list(&self) -> AnomalyIndexList {
        AnomalyIndexList::new(
            self.checks
                .iter()
                .flat_map(|c| c.flagged.iter().copied())
                .collect(),
        )
    }

    /// Number of flagged entries, duplicates included.
    pub fn flagged_count(&self) -> usize {
        self.checks.iter().map(|c| c.flagged.len()).sum()
    }
}

/// The outlier detector.
pub struct OutlierDetector {
    config: DetectionConfig,
}

impl OutlierDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Create a detector with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(DetectionConfig::default())
    }

    /// Run every check on every individual.
    ///
    /// Fails before computing anything if a required bodypart is absent.
    pub fn detect(&self, table: &CoordinateTable) -> PosefixResult<DetectionReport> {
        self.check_required_bodyparts(table)?;

        let mut report = DetectionReport::default();
        for individual in table.individuals() {
            report.checks.push(self.check_area(table, individual)?);
            for probe in &self.config.distance_probes {
                report.checks.push(self.check_distance(table, individual, probe)?);
            }
        }
        Ok(report)
    }

    fn check_required_bodyparts(&self, table: &CoordinateTable) -> PosefixResult<()> {
        let probes = self
            .config
            .distance_probes
            .iter()
            .flat_map(|p| [p.from.as_str(), p.to.as_str()]);
        for bodypart in [NOSE, LEFT_MID_WAIST, RIGHT_MID_WAIST]
            .into_iter()
            .chain(probes)
        {
            table.bodypart_index(bodypart)?;
        }
        Ok(())
    }

    fn check_area(&self, table: &CoordinateTable, individual: &str) -> PosefixResult<CheckResult> {
        let area = animal_area(table, individual)?;
        let (center, threshold) = match median(&area) {
            Some(med) => (med, self.config.area_tolerance * med),
            None => {
                tracing::warn!(individual, "No tracked frames for area check");
                (f64::NAN, f64::NAN)
            }
        };
        let flagged = outside_band(&area, center, threshold);
        tracing::debug!(
            individual,
            median = center,
            threshold,
            flagged = flagged.len(),
            "Area check"
        );

        Ok(CheckResult {
            individual: individual.to_string(),
            signal: SignalKind::Area,
            median: center,
            threshold,
            flagged,
        })
    }

    fn check_distance(
        &self,
        table: &CoordinateTable,
        individual: &str,
        probe: &BodypartProbe,
    ) -> PosefixResult<CheckResult> {
        let dist = bodypart_distance(table, individual, &probe.from, &probe.to)?;
        let (center, threshold) = match (median(&dist), mad_about_mean(&dist)) {
            (Some(med), Some(mad)) => (med, self.config.mad_multiplier * mad),
            _ => {
                tracing::warn!(
                    individual,
                    from = %probe.from,
                    to = %probe.to,
                    "No tracked frames for distance check"
                );
                (f64::NAN, f64::NAN)
            }
        };
        let flagged = outside_band(&dist, center, threshold);
        tracing::debug!(
            individual,
            from = %probe.from,
            to = %probe.to,
            median = center,
            threshold,
            flagged = flagged.len(),
            "Distance check"
        );

        Ok(CheckResult {
            individual: individual.to_string(),
            signal: SignalKind::Distance {
                from: probe.from.clone(),
                to: probe.to.clone(),
            },
            median: center,
            threshold,
            flagged,
        })
    }
}

/// Run detection on the store at `store_path` and overwrite its index list.
///
/// Returns the index list path and the detection report.
pub fn detect_anomalies(
    store_path: &Path,
    config: &DetectionConfig,
) -> PosefixResult<(PathBuf, DetectionReport)> {
    let table = load_table(store_path)?;
    let report = OutlierDetector::new(config.clone()).detect(&table)?;

    let list_path = index_list_path(store_path, &config.model_marker);
    report.index_list().save(&list_path)?;

    tracing::info!(
        store = %store_path.display(),
        index_list = %list_path.display(),
        flagged = report.flagged_count(),
        "Wrote bad tracking indices"
    );
    Ok((list_path, report))
}
