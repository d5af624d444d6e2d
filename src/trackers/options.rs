use crate::distance::EmbeddingMetric;
use serde::Deserialize;

/// Default number of consecutive frames an entity may stay unmatched before it's evicted
pub const DEFAULT_MAX_DISAPPEARED: usize = 90;

/// Default embedding distance under which an observation is matched with an entity
pub const DEFAULT_MAX_DISTANCE: f32 = 0.3;

/// How observations are associated with tracked entities
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Observations in order take the nearest free entity; ties go to the oldest entity
    #[default]
    Greedy,
    /// Minimal total distance over all admissible pairs (Hungarian algorithm)
    Optimal,
}

/// Class that is used to configure the person trackers
#[derive(Debug, Clone)]
pub struct PersonTrackerOptions {
    max_disappeared: usize,
    max_distance: f32,
    metric: EmbeddingMetric,
    assignment: AssignmentStrategy,
}

impl PersonTrackerOptions {
    /// The number of frames the entity remains alive without matched observations.
    ///
    /// The entity is evicted, and its trajectory evaluated, on the frame its
    /// disappearance counter exceeds the value.
    ///
    pub fn max_disappeared(mut self, n: usize) -> Self {
        self.max_disappeared = n;
        self
    }

    /// The embedding distance limit, a pair is matched only when its distance is strictly less.
    ///
    pub fn max_distance(mut self, distance: f32) -> Self {
        assert!(distance > 0.0, "Distance must be a positive number");
        self.max_distance = distance;
        self
    }

    /// The metric used to compare embeddings. The one you choose is defined by the ReID model used.
    ///
    pub fn metric(mut self, metric: EmbeddingMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn assignment(mut self, assignment: AssignmentStrategy) -> Self {
        self.assignment = assignment;
        self
    }

    pub fn get_max_disappeared(&self) -> usize {
        self.max_disappeared
    }

    pub fn get_max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn get_metric(&self) -> EmbeddingMetric {
        self.metric
    }

    pub fn get_assignment(&self) -> AssignmentStrategy {
        self.assignment
    }
}

impl Default for PersonTrackerOptions {
    fn default() -> Self {
        Self {
            max_disappeared: DEFAULT_MAX_DISAPPEARED,
            max_distance: DEFAULT_MAX_DISTANCE,
            metric: EmbeddingMetric::default(),
            assignment: AssignmentStrategy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::distance::EmbeddingMetric;
    use crate::trackers::options::{AssignmentStrategy, PersonTrackerOptions};

    #[test]
    fn person_tracker_options_builder() {
        let opts = PersonTrackerOptions::default();
        assert_eq!(opts.get_max_disappeared(), 90);
        assert!((opts.get_max_distance() - 0.3).abs() < f32::EPSILON);
        assert_eq!(opts.get_metric(), EmbeddingMetric::Cosine);
        assert_eq!(opts.get_assignment(), AssignmentStrategy::Greedy);

        let opts = opts
            .max_disappeared(5)
            .max_distance(2.5)
            .metric(EmbeddingMetric::Euclidean)
            .assignment(AssignmentStrategy::Optimal);
        assert_eq!(opts.get_max_disappeared(), 5);
        assert_eq!(opts.get_max_distance(), 2.5);
        assert_eq!(opts.get_metric(), EmbeddingMetric::Euclidean);
        assert_eq!(opts.get_assignment(), AssignmentStrategy::Optimal);
    }

    #[test]
    #[should_panic]
    fn non_positive_distance() {
        let _ = PersonTrackerOptions::default().max_distance(0.0);
    }
}
