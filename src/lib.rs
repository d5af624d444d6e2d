/// Distance functions for appearance feature vectors
pub mod distance;

/// Synthetic subject generators used by demos, benchmarks and tests
pub mod examples;

/// Gate model: reference axis, enclosure region and crossing verdicts
pub mod gate;

/// Crossing totals kept by a single pipeline instance
pub mod counter;

/// JSON configuration of the counter
pub mod config;

/// Frame pipeline that drives external detector and re-identifier implementations
pub mod pipeline;

/// Tracked entities, the tracker registry and crossing notifications
pub mod trackers;

/// Geometry primitives, bounding boxes and feature vectors
pub mod utils;

/// Frequently used types
pub mod prelude;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Errors {
    #[error("Configuration is invalid: {0}")]
    Configuration(String),
    #[error("Gate line is degenerate: ({0}, {1}) - ({2}, {3})")]
    GeometryDegenerateInput(f64, f64, f64, f64),
    #[error("Feature vector is empty")]
    EmptyFeature,
}

pub(crate) const EPS: f32 = 0.00001;

/// Approximate comparison for floating point based objects
pub trait EstimateClose {
    fn almost_same(&self, other: &Self, eps: f32) -> bool;
}
