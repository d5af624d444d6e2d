use crate::gate::InOutCalculator;
use crate::trackers::assignment::{greedy, optimal, DistanceMatrix};
use crate::trackers::entity::{PersonObservation, TrackedEntity};
use crate::trackers::notify::{CrossingEvent, CrossingNotifier, NoopNotifier};
use crate::trackers::options::{AssignmentStrategy, PersonTrackerOptions};
use itertools::Itertools;
use log::debug;
use std::collections::BTreeMap;

/// Registry of tracked people around a single gate.
///
/// Every call to [update](PersonTrackers::update) is one frame. Observations far from the gate are
/// dropped, the rest are matched with live entities by appearance embeddings, unmatched
/// observations open new entities and entities that stay unmatched for too long are evicted. The
/// trajectory of an evicted entity is evaluated against the gate exactly once, and the verdict is
/// sent to the notifier.
///
pub struct PersonTrackers<N = NoopNotifier>
where
    N: CrossingNotifier,
{
    gate: InOutCalculator,
    opts: PersonTrackerOptions,
    entities: BTreeMap<u64, TrackedEntity>,
    track_id: u64,
    notifier: N,
}

impl PersonTrackers<NoopNotifier> {
    /// Creates the registry that discards crossing verdicts
    ///
    pub fn without_notifier(gate: InOutCalculator, opts: PersonTrackerOptions) -> Self {
        Self::new(gate, opts, NoopNotifier)
    }
}

impl<N> PersonTrackers<N>
where
    N: CrossingNotifier,
{
    /// Creates new registry
    ///
    /// # Parameters
    /// * `gate` - the gate model used for filtering and evaluation;
    /// * `opts` - tracker options;
    /// * `notifier` - receives a verdict for every evicted entity.
    ///
    pub fn new(gate: InOutCalculator, opts: PersonTrackerOptions, notifier: N) -> Self {
        Self {
            gate,
            opts,
            entities: BTreeMap::default(),
            track_id: 0,
            notifier,
        }
    }

    fn gen_track_id(&mut self) -> u64 {
        self.track_id += 1;
        self.track_id
    }

    /// Processes observations of a single frame.
    ///
    /// Returns the entity id assigned to every observation, in the order of `observations`.
    /// Observations outside of the gate zone get `None`.
    ///
    pub fn update(&mut self, observations: Vec<PersonObservation>) -> Vec<Option<u64>> {
        let mut res = vec![None; observations.len()];

        let candidates = observations
            .into_iter()
            .enumerate()
            .filter(|(_, o)| {
                let near = self.gate.contains(&o.centroid());
                if !near {
                    debug!(
                        "Observation at ({}, {}) is out of the gate zone",
                        o.centroid().x(),
                        o.centroid().y()
                    );
                }
                near
            })
            .collect_vec();

        let ids = self.entities.keys().copied().collect_vec();
        let distances = self.distances(&candidates, &ids);
        let assignment = match self.opts.get_assignment() {
            AssignmentStrategy::Greedy => greedy(&distances, ids.len()),
            AssignmentStrategy::Optimal => {
                optimal(&distances, ids.len(), self.opts.get_max_distance())
            }
        };

        let mut matched = vec![false; ids.len()];
        for ((index, observation), col) in candidates.into_iter().zip(assignment) {
            let id = match col {
                Some(col) => {
                    matched[col] = true;
                    let id = ids[col];
                    if let Some(entity) = self.entities.get_mut(&id) {
                        entity.update(observation);
                    }
                    id
                }
                None => {
                    let id = self.gen_track_id();
                    debug!(
                        "New entity {} at ({}, {})",
                        id,
                        observation.centroid().x(),
                        observation.centroid().y()
                    );
                    self.entities
                        .insert(id, TrackedEntity::new(id, observation));
                    id
                }
            };
            res[index] = Some(id);
        }

        let max_disappeared = self.opts.get_max_disappeared();
        let mut expired = Vec::default();
        for (id, _) in ids.iter().zip(matched).filter(|(_, m)| !m) {
            if let Some(entity) = self.entities.get_mut(id) {
                if entity.mark_disappeared() > max_disappeared {
                    expired.push(*id);
                }
            }
        }

        for id in expired {
            if let Some(entity) = self.entities.remove(&id) {
                self.report(entity);
            }
        }

        res
    }

    fn distances(&self, candidates: &[(usize, PersonObservation)], ids: &[u64]) -> DistanceMatrix {
        let metric = self.opts.get_metric();
        let limit = self.opts.get_max_distance();
        candidates
            .iter()
            .map(|(_, o)| {
                ids.iter()
                    .map(|id| {
                        let entity_feature = self.entities.get(id).and_then(|e| e.feature());
                        match (o.feature(), entity_feature) {
                            (Some(l), Some(r)) => {
                                let d = metric.distance(l, r);
                                (d < limit).then_some(d)
                            }
                            _ => None,
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn report(&mut self, entity: TrackedEntity) {
        let direction = self
            .gate
            .evaluate(&entity.first_point(), &entity.last_point());
        debug!(
            "Entity {} evicted after {} observed frames, verdict: {:?}",
            entity.id(),
            entity.observed_frames(),
            direction
        );
        self.notifier.notify(&CrossingEvent {
            track_id: entity.id(),
            direction,
            gate: *self.gate.line(),
            first_point: entity.first_point(),
            last_point: entity.last_point(),
        });
    }

    /// Evaluates and evicts all live entities, e.g. when the stream ends
    ///
    pub fn flush(&mut self) {
        let entities = std::mem::take(&mut self.entities);
        for (_, entity) in entities {
            self.report(entity);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&TrackedEntity> {
        self.entities.get(&id)
    }

    /// Live entities in the order of creation
    ///
    pub fn entities(&self) -> impl Iterator<Item = &TrackedEntity> {
        self.entities.values()
    }

    pub fn gate(&self) -> &InOutCalculator {
        &self.gate
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}
