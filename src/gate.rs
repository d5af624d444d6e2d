use crate::utils::geometry::{extend, line_length, midpoint, GateLine, ReferenceAxis};
use geo::{EuclideanDistance, Point};
use log::warn;

/// Default share of the gate length the containment zone reaches past each gate endpoint
pub const DEFAULT_ENCLOSURE_PERCENT: f64 = 0.3;

/// Crossing direction relative to the gate polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// "In" crossing
    Positive,
    /// "Out" crossing
    Negative,
}

impl Direction {
    /// Direction implied by the final position of the subject; zero counts as positive
    ///
    pub fn from_distance(distance: f64) -> Self {
        if distance < 0.0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Positive => "In",
            Direction::Negative => "Out",
        }
    }
}

/// Position of a point relative to the gate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    /// Distance from the gate zero line measured along the reference axis, the sign marks the side
    pub signed_distance: f64,
    /// Whether the point is strictly inside the circle spanned by the gate
    pub in_enclosure: bool,
}

impl PositionSample {
    pub fn is_non_negative(&self) -> bool {
        self.signed_distance >= 0.0
    }
}

/// Gate model.
///
/// Built once from the gate endpoints. The perpendicular reference axis and the enclosure circle
/// are computed at construction and never change.
///
/// Two distances are in use:
/// * the signed distance used for the side test is the projection onto the reference axis, i.e.
///   the perpendicular distance to the gate zero line;
/// * the enclosure and containment tests use the plain euclidean distance to the gate midpoint.
///
#[derive(Debug, Clone)]
pub struct InOutCalculator {
    line: GateLine,
    midpoint: Point<f64>,
    axis: ReferenceAxis,
    radius: f64,
    max_distance: f64,
}

impl InOutCalculator {
    /// Creates the gate model with containment derived from [DEFAULT_ENCLOSURE_PERCENT]
    ///
    pub fn new(line: GateLine) -> Self {
        Self::with_enclosure_percent(line, DEFAULT_ENCLOSURE_PERCENT)
    }

    /// Creates the gate model. The containment distance is half the length of the gate extended
    /// by `percent` of its length on both sides.
    ///
    pub fn with_enclosure_percent(line: GateLine, percent: f64) -> Self {
        let midpoint = midpoint(&line);
        let length = line_length(&line);
        if length <= f64::EPSILON {
            warn!(
                "Gate line ({}, {}) - ({}, {}) has zero length, no subject will ever be counted",
                line.start.x, line.start.y, line.end.x, line.end.y
            );
        }

        Self {
            line,
            midpoint,
            axis: ReferenceAxis::perpendicular(&line),
            radius: length / 2.0,
            max_distance: line_length(&extend(&line, percent)) / 2.0,
        }
    }

    /// Overrides the containment distance
    ///
    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn set_max_distance(&mut self, max_distance: f64) {
        self.max_distance = max_distance;
    }

    pub fn line(&self) -> &GateLine {
        &self.line
    }

    pub fn midpoint(&self) -> Point<f64> {
        self.midpoint
    }

    pub fn axis(&self) -> &ReferenceAxis {
        &self.axis
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Signed position of the point.
    ///
    /// The distance is negated when the point is closer to the axis endpoint bound to the
    /// positive slope sign: the second endpoint for slope sign `+1`, the first for `-1`. Points
    /// equally distant from both endpoints lay on the gate zero line and are non-negative.
    ///
    pub fn position(&self, point: &Point<f64>) -> PositionSample {
        let to_start = self.axis.start().euclidean_distance(point);
        let to_end = self.axis.end().euclidean_distance(point);

        let negate = (self.axis.slope_sign() > 0 && to_end < to_start)
            || (self.axis.slope_sign() < 0 && to_start < to_end);

        let distance = self.axis.projected_distance(&self.midpoint, point);
        let signed_distance = if negate && distance > 0.0 {
            -distance
        } else {
            distance
        };

        PositionSample {
            signed_distance,
            in_enclosure: self.midpoint.euclidean_distance(point) < self.radius,
        }
    }

    /// Whether the point is near enough to the gate to be of interest
    ///
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.midpoint.euclidean_distance(point) < self.max_distance
    }

    /// Crossing verdict for a trajectory observed at `first` and finally at `last`.
    ///
    /// A side change is a crossing. Without a side change, entering or leaving the enclosure
    /// still counts, with the direction taken from the side of `last`.
    ///
    pub fn evaluate(&self, first: &Point<f64>, last: &Point<f64>) -> Option<Direction> {
        let initial = self.position(first);
        let current = self.position(last);

        if initial.is_non_negative() != current.is_non_negative()
            || initial.in_enclosure != current.in_enclosure
        {
            Some(Direction::from_distance(current.signed_distance))
        } else {
            None
        }
    }
}
