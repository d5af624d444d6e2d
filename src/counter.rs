use crate::gate::Direction;
use crate::trackers::notify::{CrossingEvent, CrossingNotifier, NoopNotifier};
use log::info;
use serde::Serialize;

/// Totals of counted crossings
///
/// `in_count` grows with [Direction::Positive] verdicts, `out_count` with [Direction::Negative]
/// ones. Trajectories that didn't cross leave both unchanged.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrossingCounts {
    pub in_count: u64,
    pub out_count: u64,
}

impl CrossingCounts {
    pub fn record(&mut self, direction: Option<Direction>) {
        match direction {
            Some(Direction::Positive) => self.in_count += 1,
            Some(Direction::Negative) => self.out_count += 1,
            None => {}
        }
    }

    pub fn total(&self) -> u64 {
        self.in_count + self.out_count
    }
}

impl CrossingNotifier for CrossingCounts {
    fn notify(&mut self, event: &CrossingEvent) {
        self.record(event.direction);
        if let Some(direction) = event.direction {
            info!(
                "Entity {} crossed the gate: {}, in: {}, out: {}",
                event.track_id,
                direction.label(),
                self.in_count,
                self.out_count
            );
        }
    }
}

/// Notifier that keeps [CrossingCounts] and forwards every event to the inner notifier
///
#[derive(Debug, Clone, Default)]
pub struct CountingNotifier<N = NoopNotifier>
where
    N: CrossingNotifier,
{
    counts: CrossingCounts,
    inner: N,
}

impl<N> CountingNotifier<N>
where
    N: CrossingNotifier,
{
    pub fn new(inner: N) -> Self {
        Self {
            counts: CrossingCounts::default(),
            inner,
        }
    }

    pub fn counts(&self) -> CrossingCounts {
        self.counts
    }
}

impl<N> CrossingNotifier for CountingNotifier<N>
where
    N: CrossingNotifier,
{
    fn notify(&mut self, event: &CrossingEvent) {
        self.counts.notify(event);
        self.inner.notify(event);
    }
}

#[cfg(test)]
mod tests {
    use crate::counter::{CountingNotifier, CrossingCounts};
    use crate::gate::Direction;
    use crate::trackers::notify::{CrossingEvent, CrossingNotifier};
    use geo::{Line, Point};

    fn event(id: u64, direction: Option<Direction>) -> CrossingEvent {
        CrossingEvent {
            track_id: id,
            direction,
            gate: Line::new((0.0, 100.0), (200.0, 100.0)),
            first_point: Point::new(100.0, 180.0),
            last_point: Point::new(100.0, 20.0),
        }
    }

    #[test]
    fn counts() {
        let mut c = CrossingCounts::default();
        c.notify(&event(1, Some(Direction::Positive)));
        c.notify(&event(2, None));
        c.notify(&event(3, Some(Direction::Negative)));
        c.notify(&event(4, Some(Direction::Positive)));
        assert_eq!(
            c,
            CrossingCounts {
                in_count: 2,
                out_count: 1
            }
        );
        assert_eq!(c.total(), 3);
    }

    #[test]
    fn serialized_counts() {
        let c = CrossingCounts {
            in_count: 4,
            out_count: 2,
        };
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"in_count":4,"out_count":2}"#
        );
    }

    #[test]
    fn counting_notifier_forwards() {
        let mut seen = Vec::new();
        {
            let mut n = CountingNotifier::new(|e: &CrossingEvent| seen.push(e.track_id));
            n.notify(&event(1, Some(Direction::Negative)));
            n.notify(&event(2, None));
            assert_eq!(n.counts().out_count, 1);
            assert_eq!(n.counts().in_count, 0);
        }
        assert_eq!(seen, vec![1, 2]);
    }
}
