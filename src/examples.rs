use crate::pipeline::{Detection, Frame, PersonDetector, Reidentifier};
use crate::trackers::entity::PersonObservation;
use crate::utils::bbox::{Anchor, BoundingBox};
use crate::utils::feature::{Feature, FromVec};
use crate::EstimateClose;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Box {0:?} doesn't belong to any visible walker")]
    UnknownBox(BoundingBox),
}

/// Position and appearance of a walker in a single frame
///
#[derive(Debug, Clone)]
pub struct WalkerStep {
    pub bbox: BoundingBox,
    pub feature: Vec<f32>,
}

impl WalkerStep {
    pub fn observation(&self) -> PersonObservation {
        PersonObservation::from_bbox(
            self.bbox,
            Anchor::BottomCenter,
            Some(Feature::from_vec(self.feature.clone())),
        )
    }
}

/// Subject walking along a straight line with a constant speed.
///
/// The generator is seeded, so the same arguments always produce the same walk. The embedding is
/// a random base vector with a small per-frame noise, so the walker stays recognizable.
///
pub struct WalkerGen {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
    width: f32,
    height: f32,
    base: Vec<f32>,
    gen: StdRng,
    noise: Uniform<f32>,
}

impl WalkerGen {
    /// Constructor
    ///
    /// # Parameters
    /// * `seed` - random generator seed, defines the appearance;
    /// * `foot` - initial foot point;
    /// * `velocity` - foot point displacement per frame;
    /// * `feature_len` - embedding length.
    ///
    pub fn new(seed: u64, foot: (f32, f32), velocity: (f32, f32), feature_len: usize) -> Self {
        let mut gen = StdRng::seed_from_u64(seed);
        let base_dist = Uniform::new(-1.0_f32, 1.0);
        let base = (0..feature_len).map(|_| gen.sample(base_dist)).collect();
        Self {
            x: foot.0,
            y: foot.1,
            dx: velocity.0,
            dy: velocity.1,
            width: 40.0,
            height: 100.0,
            base,
            gen,
            noise: Uniform::new_inclusive(-0.01_f32, 0.01),
        }
    }

    pub fn with_box_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Iterator for WalkerGen {
    type Item = WalkerStep;

    fn next(&mut self) -> Option<Self::Item> {
        let bbox = BoundingBox::new(
            self.x - self.width / 2.0,
            self.y - self.height,
            self.width,
            self.height,
        );
        let feature = self
            .base
            .iter()
            .map(|v| v + self.gen.sample(self.noise))
            .collect();

        self.x += self.dx;
        self.y += self.dy;

        Some(WalkerStep { bbox, feature })
    }
}

/// Walker that is visible in frames `[appears, appears + frames)`
///
pub struct SceneWalker {
    pub appears: usize,
    pub frames: usize,
    pub walk: WalkerGen,
}

type Visible = Rc<RefCell<Vec<WalkerStep>>>;

/// Detector that "sees" synthetic walkers, frame data is ignored
///
pub struct SceneDetector {
    frame: usize,
    walkers: Vec<SceneWalker>,
    visible: Visible,
}

/// Re-identifier that knows the appearance of the walkers found by [SceneDetector] in the
/// current frame
///
pub struct SceneReidentifier {
    visible: Visible,
}

/// Creates the detector and the re-identifier for a synthetic scene
///
pub fn scene(walkers: Vec<SceneWalker>) -> (SceneDetector, SceneReidentifier) {
    let visible = Visible::default();
    (
        SceneDetector {
            frame: 0,
            walkers,
            visible: visible.clone(),
        },
        SceneReidentifier { visible },
    )
}

impl SceneDetector {
    /// Frames of the scene until the last walker leaves
    ///
    pub fn duration(&self) -> usize {
        self.walkers
            .iter()
            .map(|w| w.appears + w.frames)
            .max()
            .unwrap_or(0)
    }
}

impl PersonDetector for SceneDetector {
    type Error = SceneError;

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        let frame = self.frame;
        self.frame += 1;

        let steps = self
            .walkers
            .iter_mut()
            .filter(|w| (w.appears..w.appears + w.frames).contains(&frame))
            .filter_map(|w| w.walk.next())
            .collect::<Vec<_>>();

        let detections = steps
            .iter()
            .map(|s| Detection::new(s.bbox, 0.95, 1))
            .collect();
        *self.visible.borrow_mut() = steps;
        Ok(detections)
    }
}

impl Reidentifier for SceneReidentifier {
    type Error = SceneError;

    fn embed(&mut self, _frame: &Frame, bbox: &BoundingBox) -> Result<Vec<f32>, Self::Error> {
        self.visible
            .borrow()
            .iter()
            .find(|s| s.bbox.almost_same(bbox, 0.001))
            .map(|s| s.feature.clone())
            .ok_or(SceneError::UnknownBox(*bbox))
    }
}

#[cfg(test)]
mod tests {
    use crate::examples::{scene, SceneWalker, WalkerGen};
    use crate::pipeline::{Frame, PersonDetector, Reidentifier};
    use crate::utils::bbox::BoundingBox;

    #[test]
    fn straight_walk() {
        let steps = WalkerGen::new(1, (100.0, 180.0), (0.0, -10.0), 4)
            .with_box_size(20.0, 50.0)
            .take(3)
            .collect::<Vec<_>>();
        assert_eq!(steps[0].bbox, BoundingBox::new(90.0, 130.0, 20.0, 50.0));
        assert_eq!(steps[2].bbox, BoundingBox::new(90.0, 110.0, 20.0, 50.0));
        assert_eq!(steps[0].observation().centroid().y(), 180.0);
        for s in &steps {
            assert_eq!(s.feature.len(), 4);
            for (l, r) in s.feature.iter().zip(&steps[0].feature) {
                assert!((l - r).abs() <= 0.021);
            }
        }
    }

    #[test]
    fn seeded_walks_repeat() {
        let a = WalkerGen::new(7, (0.0, 0.0), (1.0, 1.0), 8).nth(5).unwrap();
        let b = WalkerGen::new(7, (0.0, 0.0), (1.0, 1.0), 8).nth(5).unwrap();
        let c = WalkerGen::new(8, (0.0, 0.0), (1.0, 1.0), 8).nth(5).unwrap();
        assert_eq!(a.feature, b.feature);
        assert_ne!(a.feature, c.feature);
    }

    #[test]
    fn scene_visibility() {
        let (mut detector, mut reid) = scene(vec![
            SceneWalker {
                appears: 0,
                frames: 2,
                walk: WalkerGen::new(1, (50.0, 50.0), (1.0, 0.0), 4),
            },
            SceneWalker {
                appears: 1,
                frames: 2,
                walk: WalkerGen::new(2, (150.0, 50.0), (-1.0, 0.0), 4),
            },
        ]);
        assert_eq!(detector.duration(), 3);
        let frame = Frame::new(&[], 200, 200);

        let d = detector.detect(&frame).unwrap();
        assert_eq!(d.len(), 1);
        assert!(reid.embed(&frame, &d[0].bbox).is_ok());

        let d = detector.detect(&frame).unwrap();
        assert_eq!(d.len(), 2);
        let f1 = reid.embed(&frame, &d[0].bbox).unwrap();
        let f2 = reid.embed(&frame, &d[1].bbox).unwrap();
        assert_ne!(f1, f2);

        let d = detector.detect(&frame).unwrap();
        assert_eq!(d.len(), 1);
        assert!(reid
            .embed(&frame, &BoundingBox::new(0.0, 0.0, 1.0, 1.0))
            .is_err());

        assert!(detector.detect(&frame).unwrap().is_empty());
    }
}
