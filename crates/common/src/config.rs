//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PosefixError, PosefixResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display-space settings used when points are shown or edited.
    pub display: DisplayConfig,

    /// Outlier detection parameters.
    pub detection: DetectionConfig,

    /// File recording the last reviewed frame per video.
    pub session_file: PathBuf,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Display-space parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Factor applied to table coordinates before they are drawn.
    /// Edited points are divided by it before they are written back.
    pub scale_factor: f64,
}

/// A pair of bodyparts whose per-frame distance is checked for outliers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodypartProbe {
    pub from: String,
    pub to: String,
}

impl BodypartProbe {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Outlier detection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Fraction of the median area tolerated on either side of it.
    pub area_tolerance: f64,

    /// Multiplier applied to the deviation of each distance probe.
    pub mad_multiplier: f64,

    /// Bodypart pairs checked per individual, in order.
    pub distance_probes: Vec<BodypartProbe>,

    /// Substring of the store filename where the model identifier starts.
    pub model_marker: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "posefix=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            detection: DetectionConfig::default(),
            session_file: PathBuf::from("last_video_frame.json"),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { scale_factor: 0.5 }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            area_tolerance: 0.5,
            mad_multiplier: 2.75,
            distance_probes: vec![
                BodypartProbe::new("Nose", "betweenEars"),
                BodypartProbe::new("tailStart", "midHip"),
            ],
            model_marker: "CNN".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> PosefixResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PosefixError::io(path, e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| PosefixError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> PosefixResult<()> {
        if self.display.scale_factor <= 0.0 || !self.display.scale_factor.is_finite() {
            return Err(PosefixError::config(format!(
                "display.scale_factor must be positive, got {}",
                self.display.scale_factor
            )));
        }
        if self.detection.area_tolerance < 0.0 || self.detection.mad_multiplier < 0.0 {
            return Err(PosefixError::config(
                "detection tolerances must not be negative",
            ));
        }
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("posefix").join("config.json")
}
