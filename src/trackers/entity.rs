use crate::utils::bbox::{Anchor, BoundingBox};
use crate::utils::feature::Feature;
use geo::Point;

/// Person observed in a single frame, ready to be associated with tracked entities
///
#[derive(Debug, Clone)]
pub struct PersonObservation {
    bbox: BoundingBox,
    centroid: Point<f64>,
    feature: Option<Feature>,
}

impl PersonObservation {
    /// Constructor
    ///
    /// # Parameters
    /// * `bbox` - the detected box;
    /// * `centroid` - the point representing the subject position, evaluated against the gate;
    /// * `feature` - re-identification embedding, absent when the re-identifier failed for the box.
    ///
    pub fn new(bbox: BoundingBox, centroid: Point<f64>, feature: Option<Feature>) -> Self {
        Self {
            bbox,
            centroid,
            feature,
        }
    }

    /// Constructor that takes the centroid from the box
    ///
    pub fn from_bbox(bbox: BoundingBox, anchor: Anchor, feature: Option<Feature>) -> Self {
        Self::new(bbox, bbox.anchor(anchor), feature)
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn centroid(&self) -> Point<f64> {
        self.centroid
    }

    pub fn feature(&self) -> Option<&Feature> {
        self.feature.as_ref()
    }
}

/// Identity-stable record of a single subject.
///
/// `first_point` is set once, when the entity is created, and anchors the crossing evaluation
/// done at eviction; `last_point` follows every matched observation.
///
#[derive(Debug, Clone)]
pub struct TrackedEntity {
    id: u64,
    bbox: BoundingBox,
    feature: Option<Feature>,
    first_point: Point<f64>,
    last_point: Point<f64>,
    disappeared_count: usize,
    observed_frames: usize,
}

impl TrackedEntity {
    pub(crate) fn new(id: u64, observation: PersonObservation) -> Self {
        Self {
            id,
            bbox: observation.bbox,
            feature: observation.feature,
            first_point: observation.centroid,
            last_point: observation.centroid,
            disappeared_count: 0,
            observed_frames: 1,
        }
    }

    /// Merges the observation matched in the current frame
    ///
    pub(crate) fn update(&mut self, observation: PersonObservation) {
        self.bbox = observation.bbox;
        if observation.feature.is_some() {
            self.feature = observation.feature;
        }
        self.last_point = observation.centroid;
        self.disappeared_count = 0;
        self.observed_frames += 1;
    }

    /// Registers the frame without a match, returns the number of consecutive such frames
    ///
    pub(crate) fn mark_disappeared(&mut self) -> usize {
        self.disappeared_count += 1;
        self.disappeared_count
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn feature(&self) -> Option<&Feature> {
        self.feature.as_ref()
    }

    pub fn first_point(&self) -> Point<f64> {
        self.first_point
    }

    pub fn last_point(&self) -> Point<f64> {
        self.last_point
    }

    pub fn disappeared_count(&self) -> usize {
        self.disappeared_count
    }

    pub fn observed_frames(&self) -> usize {
        self.observed_frames
    }
}

#[cfg(test)]
mod tests {
    use crate::trackers::entity::{PersonObservation, TrackedEntity};
    use crate::utils::bbox::{Anchor, BoundingBox};
    use crate::utils::feature::{Feature, FromVec};
    use geo::Point;

    #[test]
    fn lifecycle() {
        let bb = BoundingBox::new(80.0, 100.0, 40.0, 80.0);
        let obs = PersonObservation::from_bbox(
            bb,
            Anchor::BottomCenter,
            Some(Feature::from_vec(vec![1.0, 0.0])),
        );
        let mut e = TrackedEntity::new(7, obs);
        assert_eq!(e.id(), 7);
        assert_eq!(e.first_point(), Point::new(100.0, 180.0));
        assert_eq!(e.last_point(), e.first_point());
        assert_eq!(e.disappeared_count(), 0);
        assert_eq!(e.observed_frames(), 1);

        assert_eq!(e.mark_disappeared(), 1);
        assert_eq!(e.mark_disappeared(), 2);

        let moved = BoundingBox::new(80.0, -60.0, 40.0, 80.0);
        e.update(PersonObservation::from_bbox(moved, Anchor::BottomCenter, None));
        assert_eq!(e.disappeared_count(), 0);
        assert_eq!(e.first_point(), Point::new(100.0, 180.0));
        assert_eq!(e.last_point(), Point::new(100.0, 20.0));
        assert_eq!(e.bbox(), &moved);
        assert!(e.feature().is_some());
        assert_eq!(e.observed_frames(), 2);
    }
}
