use crate::distance::EmbeddingMetric;
use crate::gate::{InOutCalculator, DEFAULT_ENCLOSURE_PERCENT};
use crate::trackers::options::{
    AssignmentStrategy, PersonTrackerOptions, DEFAULT_MAX_DISAPPEARED, DEFAULT_MAX_DISTANCE,
};
use crate::utils::bbox::Anchor;
use crate::utils::geometry::{validate_gate, GateLine};
use crate::Errors;
use anyhow::{Context, Result};
use geo::Line;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.85;
pub const DEFAULT_PERSON_CLASS_ID: i64 = 1;

fn default_confidence_threshold() -> f32 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_max_disappeared() -> usize {
    DEFAULT_MAX_DISAPPEARED
}

fn default_max_distance() -> f32 {
    DEFAULT_MAX_DISTANCE
}

fn default_enclosure_percent() -> f64 {
    DEFAULT_ENCLOSURE_PERCENT
}

fn default_person_class_id() -> i64 {
    DEFAULT_PERSON_CLASS_ID
}

/// Counter configuration, normally read once from a JSON file at startup.
///
/// The gate is given as two `[x, y]` points in percents of the frame size, so the same
/// configuration fits any resolution of the video source. Model and video locations are opaque
/// to the crate and passed through to the detector and re-identifier implementations.
///
/// ```json
/// {
///   "coords": [[0.0, 50.0], [100.0, 50.0]],
///   "confidence_threshold": 0.85,
///   "metric": "cosine"
/// }
/// ```
///
#[derive(Debug, Clone, Deserialize)]
pub struct GateCountConfig {
    pub coords: [[f64; 2]; 2],
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_max_disappeared")]
    pub max_disappeared: usize,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_enclosure_percent")]
    pub enclosure_percent: f64,
    #[serde(default = "default_person_class_id")]
    pub person_class_id: i64,
    #[serde(default)]
    pub metric: EmbeddingMetric,
    #[serde(default)]
    pub assignment: AssignmentStrategy,
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub pedestrian_model_description: Option<String>,
    #[serde(default)]
    pub pedestrian_model_weights: Option<String>,
    #[serde(default)]
    pub reidentification_model_description: Option<String>,
    #[serde(default)]
    pub reidentification_model_weights: Option<String>,
}

impl GateCountConfig {
    /// Parses and validates the configuration
    ///
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Errors::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read configuration from {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        for [x, y] in self.coords {
            if !(0.0..=100.0).contains(&x) || !(0.0..=100.0).contains(&y) {
                return Err(Errors::Configuration(format!(
                    "Gate point ({}, {}) must be within [0, 100] percents",
                    x, y
                ))
                .into());
            }
        }

        validate_gate(&Line::new(
            (self.coords[0][0], self.coords[0][1]),
            (self.coords[1][0], self.coords[1][1]),
        ))?;

        if !(0.0..1.0).contains(&self.confidence_threshold) {
            return Err(Errors::Configuration(format!(
                "Confidence threshold {} must be within [0, 1)",
                self.confidence_threshold
            ))
            .into());
        }

        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(Errors::Configuration(format!(
                "Max distance {} must be a positive number",
                self.max_distance
            ))
            .into());
        }

        if !(self.enclosure_percent.is_finite() && self.enclosure_percent >= 0.0) {
            return Err(Errors::Configuration(format!(
                "Enclosure percent {} must be a non-negative number",
                self.enclosure_percent
            ))
            .into());
        }

        Ok(())
    }

    /// Gate line in pixels of a `width` x `height` frame. Coordinates are truncated to whole
    /// pixels.
    ///
    pub fn gate_line(&self, width: u32, height: u32) -> GateLine {
        let px = |percent: f64, size: u32| (percent * f64::from(size) / 100.0).trunc();
        Line::new(
            (
                px(self.coords[0][0], width),
                px(self.coords[0][1], height),
            ),
            (
                px(self.coords[1][0], width),
                px(self.coords[1][1], height),
            ),
        )
    }

    /// Gate model for a `width` x `height` frame
    ///
    pub fn gate(&self, width: u32, height: u32) -> InOutCalculator {
        InOutCalculator::with_enclosure_percent(
            self.gate_line(width, height),
            self.enclosure_percent,
        )
    }

    pub fn tracker_options(&self) -> PersonTrackerOptions {
        PersonTrackerOptions::default()
            .max_disappeared(self.max_disappeared)
            .max_distance(self.max_distance)
            .metric(self.metric)
            .assignment(self.assignment)
    }
}
