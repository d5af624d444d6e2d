use crate::gate::Direction;
use crate::utils::geometry::GateLine;
use geo::Point;

/// Verdict for a single trajectory, produced when its tracked entity is evicted
///
#[derive(Debug, Clone, PartialEq)]
pub struct CrossingEvent {
    pub track_id: u64,
    /// `None` when the trajectory didn't cross the gate
    pub direction: Option<Direction>,
    pub gate: GateLine,
    pub first_point: Point<f64>,
    pub last_point: Point<f64>,
}

/// Receiver of crossing verdicts
///
/// Any `FnMut(&CrossingEvent)` closure is a notifier as well.
///
pub trait CrossingNotifier {
    fn notify(&mut self, event: &CrossingEvent);
}

#[derive(Default, Clone, Debug)]
pub struct NoopNotifier;

impl CrossingNotifier for NoopNotifier {
    fn notify(&mut self, _event: &CrossingEvent) {}
}

impl<F> CrossingNotifier for F
where
    F: FnMut(&CrossingEvent),
{
    fn notify(&mut self, event: &CrossingEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use crate::gate::Direction;
    use crate::trackers::notify::{CrossingEvent, CrossingNotifier, NoopNotifier};
    use geo::{Line, Point};

    fn event() -> CrossingEvent {
        CrossingEvent {
            track_id: 1,
            direction: Some(Direction::Positive),
            gate: Line::new((0.0, 100.0), (200.0, 100.0)),
            first_point: Point::new(100.0, 180.0),
            last_point: Point::new(100.0, 20.0),
        }
    }

    #[test]
    fn closure_notifier() {
        let mut received = Vec::new();
        {
            let mut n = |e: &CrossingEvent| received.push(e.track_id);
            n.notify(&event());
            n.notify(&event());
        }
        assert_eq!(received, vec![1, 1]);
    }

    #[test]
    fn noop_notifier() {
        NoopNotifier.notify(&event());
    }
}
