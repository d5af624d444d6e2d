#![feature(test)]

extern crate test;

use gatecount::examples::WalkerGen;
use gatecount::gate::InOutCalculator;
use gatecount::trackers::options::{AssignmentStrategy, PersonTrackerOptions};
use gatecount::trackers::person_trackers::PersonTrackers;
use geo::Line;
use test::Bencher;

#[bench]
fn bench_greedy_00010(b: &mut Bencher) {
    bench_trackers(10, AssignmentStrategy::Greedy, b);
}

#[bench]
fn bench_greedy_00050(b: &mut Bencher) {
    bench_trackers(50, AssignmentStrategy::Greedy, b);
}

#[bench]
fn bench_greedy_00100(b: &mut Bencher) {
    bench_trackers(100, AssignmentStrategy::Greedy, b);
}

#[bench]
fn bench_optimal_00010(b: &mut Bencher) {
    bench_trackers(10, AssignmentStrategy::Optimal, b);
}

#[bench]
fn bench_optimal_00050(b: &mut Bencher) {
    bench_trackers(50, AssignmentStrategy::Optimal, b);
}

fn bench_trackers(objects: usize, assignment: AssignmentStrategy, b: &mut Bencher) {
    let mut walkers = (0..objects)
        .map(|i| WalkerGen::new(i as u64, (10.0 * i as f32, 0.0), (0.0, 0.0), 256))
        .collect::<Vec<_>>();

    let gate = InOutCalculator::new(Line::new((0.0, 0.0), (10.0 * objects as f64, 0.0)));
    let opts = PersonTrackerOptions::default().assignment(assignment);
    let mut trackers = PersonTrackers::without_notifier(gate, opts);

    b.iter(|| {
        let observations = walkers
            .iter_mut()
            .map(|w| w.next().unwrap().observation())
            .collect::<Vec<_>>();
        let ids = trackers.update(observations);
        assert_eq!(ids.iter().flatten().count(), objects);
    });
    assert_eq!(trackers.len(), objects);
}
