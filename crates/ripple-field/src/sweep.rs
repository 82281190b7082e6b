//! Read-phase intersection sweep.
//!
//! The sweep is a pure function of the aged wavefront pool, the polled
//! receiver positions, and the previous tick's memoized distances. It
//! produces arrival snapshots and distance-memo updates without
//! touching the registry, so the registry can commit them afterwards —
//! list mutation never interleaves with in-flight intersection tests.
//!
//! Because the inputs are immutable for the duration of the sweep, the
//! pool can be chunked across scoped worker threads; partial results
//! are collected over a channel and re-sorted into pool order so
//! combiner tie-breaking stays deterministic regardless of thread
//! scheduling.

use crate::wavefront::Wavefront;
use crossbeam_channel::unbounded;
use ripple_core::{ObjectId, Vec3, WavefrontId};
use std::collections::HashMap;

/// Results of one intersection sweep.
#[derive(Default)]
pub(crate) struct SweepOutcome {
    /// `(pool index, receiver, arrival-time snapshot)`, in pool order.
    pub(crate) arrivals: Vec<(usize, ObjectId, Wavefront)>,
    /// Distance-memo updates to commit after the read phase.
    pub(crate) distances: Vec<((WavefrontId, ObjectId), f64)>,
}

/// Run the sweep over every `(wavefront, receiver)` pair.
///
/// `threads > 1` chunks the pool across that many scoped workers;
/// otherwise the sweep runs on the calling thread.
pub(crate) fn run(
    pool: &[&Wavefront],
    receivers: &[(ObjectId, Vec3)],
    previous: &HashMap<(WavefrontId, ObjectId), f64>,
    threads: usize,
) -> SweepOutcome {
    if threads > 1 && pool.len() >= 2 {
        run_chunked(pool, receivers, previous, threads)
    } else {
        run_range(pool, receivers, previous, 0, pool.len())
    }
}

/// Sweep one contiguous slice of the pool.
fn run_range(
    pool: &[&Wavefront],
    receivers: &[(ObjectId, Vec3)],
    previous: &HashMap<(WavefrontId, ObjectId), f64>,
    start: usize,
    end: usize,
) -> SweepOutcome {
    let mut outcome = SweepOutcome::default();
    for index in start..end {
        let wave = pool[index];
        // A wavefront that has not left its source is not testable yet.
        if wave.intensity().is_none() {
            continue;
        }
        for &(receiver, position) in receivers {
            let dist_sq = wave.center().distance_sq(position);
            let key = (wave.id(), receiver);
            let previous_dist_sq = previous.get(&key).copied().unwrap_or(dist_sq);
            outcome.distances.push((key, dist_sq));
            if wave.intersects(dist_sq, previous_dist_sq) {
                let arrival_time = wave.emitted_at() + dist_sq.sqrt() / wave.speed();
                outcome
                    .arrivals
                    .push((index, receiver, wave.snapshot_at(arrival_time)));
            }
        }
    }
    outcome
}

/// Chunk the pool across scoped workers and merge their partials.
fn run_chunked(
    pool: &[&Wavefront],
    receivers: &[(ObjectId, Vec3)],
    previous: &HashMap<(WavefrontId, ObjectId), f64>,
    threads: usize,
) -> SweepOutcome {
    let workers = threads.min(pool.len());
    let chunk = pool.len().div_ceil(workers);
    let (tx, rx) = unbounded::<SweepOutcome>();

    std::thread::scope(|scope| {
        for worker in 0..workers {
            let tx = tx.clone();
            let start = worker * chunk;
            let end = ((worker + 1) * chunk).min(pool.len());
            scope.spawn(move || {
                let _ = tx.send(run_range(pool, receivers, previous, start, end));
            });
        }
        drop(tx);

        let mut merged = SweepOutcome::default();
        for partial in rx {
            merged.arrivals.extend(partial.arrivals);
            merged.distances.extend(partial.distances);
        }
        merged
            .arrivals
            .sort_by_key(|&(index, receiver, _)| (index, receiver));
        merged
    })
}
