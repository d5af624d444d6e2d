use crate::config::GateCountConfig;
use crate::counter::{CountingNotifier, CrossingCounts};
use crate::gate::InOutCalculator;
use crate::trackers::entity::{PersonObservation, TrackedEntity};
use crate::trackers::notify::{CrossingEvent, CrossingNotifier, NoopNotifier};
use crate::trackers::person_trackers::PersonTrackers;
use crate::utils::bbox::BoundingBox;
use crate::utils::feature::embedding_feature;
use crate::utils::geometry::{validate_gate, GateLine};
use anyhow::{anyhow, Result};
use geo::Point;
use itertools::Itertools;
use log::{debug, info, warn};
use std::fmt::Display;

/// Raw frame handed to the detector and the re-identifier
///
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Image bytes, the layout is up to the detector and re-identifier implementations
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

/// Object found by the detector, the box is in frame pixels
///
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: i64,
}

impl Detection {
    pub fn new(bbox: BoundingBox, confidence: f32, class_id: i64) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
        }
    }
}

/// Object detection backend.
///
/// Implement the trait to connect a detection model to the counter.
///
/// ```ignore
/// struct MyDetector;
///
/// impl PersonDetector for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait PersonDetector {
    type Error: Display;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error>;
}

/// Appearance embedding backend.
///
/// Embeddings are compared with each other only, so their length and scale are up to the model,
/// but they must stay the same for the whole stream.
///
pub trait Reidentifier {
    type Error: Display;

    fn embed(&mut self, frame: &Frame, bbox: &BoundingBox) -> Result<Vec<f32>, Self::Error>;
}

/// Public view of a tracked entity
///
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub id: u64,
    pub bbox: BoundingBox,
    pub first_point: Point<f64>,
    pub last_point: Point<f64>,
    pub disappeared_count: usize,
}

impl From<&TrackedEntity> for EntitySnapshot {
    fn from(e: &TrackedEntity) -> Self {
        Self {
            id: e.id(),
            bbox: *e.bbox(),
            first_point: e.first_point(),
            last_point: e.last_point(),
            disappeared_count: e.disappeared_count(),
        }
    }
}

/// State of the counter after a frame, everything needed to render it
///
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Zero-based index of the frame in the stream
    pub frame_index: usize,
    pub gate: GateLine,
    pub counts: CrossingCounts,
    /// Live entities in the order of creation
    pub entities: Vec<EntitySnapshot>,
    /// Person detections above the confidence threshold
    pub detections: usize,
}

/// Verdicts produced by the registry during a single call, handed over to the pipeline
/// notifier right after it
///
#[derive(Debug, Default)]
struct EventBuffer(Vec<CrossingEvent>);

impl CrossingNotifier for EventBuffer {
    fn notify(&mut self, event: &CrossingEvent) {
        self.0.push(event.clone());
    }
}

/// Counts people crossing the configured gate in a stream of frames.
///
/// The gate and the tracker registry are created on the first frame, when the frame size gets
/// known. Detector failures are treated as frames without people, re-identifier failures leave
/// the observation without an embedding, so it can't be matched with tracked entities.
///
pub struct LineCrossing<D, R, N = NoopNotifier>
where
    D: PersonDetector,
    R: Reidentifier,
    N: CrossingNotifier,
{
    config: GateCountConfig,
    detector: D,
    reidentifier: R,
    notifier: CountingNotifier<N>,
    trackers: Option<PersonTrackers<EventBuffer>>,
    frame_index: usize,
}

impl<D, R> LineCrossing<D, R, NoopNotifier>
where
    D: PersonDetector,
    R: Reidentifier,
{
    pub fn without_notifier(config: GateCountConfig, detector: D, reidentifier: R) -> Self {
        Self::new(config, detector, reidentifier, NoopNotifier)
    }
}

impl<D, R, N> LineCrossing<D, R, N>
where
    D: PersonDetector,
    R: Reidentifier,
    N: CrossingNotifier,
{
    /// Creates the pipeline
    ///
    /// # Parameters
    /// * `config` - validated configuration;
    /// * `detector` - object detection backend;
    /// * `reidentifier` - appearance embedding backend;
    /// * `notifier` - receives the verdict of every finished trajectory.
    ///
    pub fn new(config: GateCountConfig, detector: D, reidentifier: R, notifier: N) -> Self {
        Self {
            config,
            detector,
            reidentifier,
            notifier: CountingNotifier::new(notifier),
            trackers: None,
            frame_index: 0,
        }
    }

    fn start(config: &GateCountConfig, frame: &Frame) -> Result<PersonTrackers<EventBuffer>> {
        let line = config.gate_line(frame.width, frame.height);
        validate_gate(&line)?;
        let gate = config.gate(frame.width, frame.height);
        info!(
            "Gate ({}, {}) - ({}, {}) for {}x{} frames, max distance: {}",
            line.start.x,
            line.start.y,
            line.end.x,
            line.end.y,
            frame.width,
            frame.height,
            gate.max_distance()
        );

        Ok(PersonTrackers::new(
            gate,
            config.tracker_options(),
            EventBuffer::default(),
        ))
    }

    fn deliver(trackers: &mut PersonTrackers<EventBuffer>, notifier: &mut CountingNotifier<N>) {
        for event in trackers.notifier_mut().0.drain(..) {
            notifier.notify(&event);
        }
    }

    fn observe(
        config: &GateCountConfig,
        detector: &mut D,
        reidentifier: &mut R,
        gate: &InOutCalculator,
        frame: &Frame,
    ) -> (usize, Vec<PersonObservation>) {
        let detections = detector.detect(frame).unwrap_or_else(|e| {
            warn!("Detection failed, the frame is considered empty: {}", e);
            vec![]
        });

        let people = detections
            .into_iter()
            .filter(|d| {
                d.class_id == config.person_class_id && d.confidence > config.confidence_threshold
            })
            .collect_vec();

        let observations = people
            .iter()
            .filter_map(|d| {
                let centroid = d.bbox.anchor(config.anchor);
                if !gate.contains(&centroid) {
                    return None;
                }
                let feature = reidentifier
                    .embed(frame, &d.bbox)
                    .map_err(|e| anyhow!("{}", e))
                    .and_then(embedding_feature);
                if let Err(e) = &feature {
                    warn!("Re-identification of {:?} failed: {}", d.bbox, e);
                }
                Some(PersonObservation::new(d.bbox, centroid, feature.ok()))
            })
            .collect();

        (people.len(), observations)
    }

    /// Processes the next frame of the stream.
    ///
    /// Fails only on the first frame, when the gate derived from the frame size is degenerate.
    ///
    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameOutput> {
        let trackers = match self.trackers.take() {
            Some(t) => t,
            None => Self::start(&self.config, frame)?,
        };
        let trackers = self.trackers.insert(trackers);

        let (detections, observations) = Self::observe(
            &self.config,
            &mut self.detector,
            &mut self.reidentifier,
            trackers.gate(),
            frame,
        );
        let ids = trackers.update(observations);
        Self::deliver(trackers, &mut self.notifier);
        debug!(
            "Frame {}: {} person detections, {} tracked, {} live entities",
            self.frame_index,
            detections,
            ids.iter().flatten().count(),
            trackers.len()
        );

        let output = FrameOutput {
            frame_index: self.frame_index,
            gate: *trackers.gate().line(),
            counts: self.notifier.counts(),
            entities: trackers.entities().map(EntitySnapshot::from).collect(),
            detections,
        };
        self.frame_index += 1;
        Ok(output)
    }

    /// Processes all the frames, then evaluates the trajectories still in flight.
    ///
    pub fn run<'a, I>(&mut self, frames: I) -> Result<CrossingCounts>
    where
        I: IntoIterator<Item = Frame<'a>>,
    {
        for frame in frames {
            self.process_frame(&frame)?;
        }
        self.flush();
        Ok(self.counts())
    }

    /// Evaluates and forgets all live entities
    ///
    pub fn flush(&mut self) {
        if let Some(trackers) = self.trackers.as_mut() {
            trackers.flush();
            Self::deliver(trackers, &mut self.notifier);
        }
    }

    pub fn counts(&self) -> CrossingCounts {
        self.notifier.counts()
    }

    /// The gate, known after the first frame
    ///
    pub fn gate(&self) -> Option<&InOutCalculator> {
        self.trackers.as_ref().map(|t| t.gate())
    }

    /// The number of processed frames
    ///
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn config(&self) -> &GateCountConfig {
        &self.config
    }

    /// Flushes the live entities and returns the counts together with the caller's notifier
    ///
    pub fn finish(mut self) -> CountingNotifier<N> {
        self.flush();
        self.notifier
    }
}
