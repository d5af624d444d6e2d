pub use crate::config::GateCountConfig;
pub use crate::counter::{CountingNotifier, CrossingCounts};
pub use crate::gate::{Direction, InOutCalculator};
pub use crate::pipeline::{
    Detection, Frame, FrameOutput, LineCrossing, PersonDetector, Reidentifier,
};
pub use crate::trackers::entity::{PersonObservation, TrackedEntity};
pub use crate::trackers::notify::{CrossingEvent, CrossingNotifier, NoopNotifier};
pub use crate::trackers::options::{AssignmentStrategy, PersonTrackerOptions};
pub use crate::trackers::person_trackers::PersonTrackers;
pub use crate::utils::bbox::{Anchor, BoundingBox};
