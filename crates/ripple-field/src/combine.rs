//! Interference combination policies.
//!
//! When several wavefronts reach one receiver on the same tick, a
//! combine policy reduces them to the single [`FieldReading`] the
//! receiver observes. The policy is injected into the field at
//! construction, keeping the tick loop agnostic of how interference is
//! modeled.
//!
//! Two policies are provided:
//!
//! - [`FirstArrival`] — the receiver only perceives the first wavefront
//!   in arrival-pool order; no interference.
//! - [`AmplitudeSuperposition`] — complex-amplitude superposition with
//!   probabilistic payload perception, driven by an injected RNG so
//!   outcomes replay deterministically under a fixed seed.

use crate::wavefront::Wavefront;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ripple_core::FieldReading;
use std::f64::consts::PI;

/// Reduces the wavefronts that reached one receiver this tick to a
/// single reading.
///
/// `arrivals` holds arrival-time snapshots in arrival-pool order and is
/// never empty.
pub trait CombinePolicy: Send {
    /// Produce the observed reading for one receiver.
    fn combine(&mut self, arrivals: &[Wavefront]) -> FieldReading;
}

/// Default policy: the earliest-processed wavefront wins, unmodified.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstArrival;

impl CombinePolicy for FirstArrival {
    fn combine(&mut self, arrivals: &[Wavefront]) -> FieldReading {
        debug_assert!(!arrivals.is_empty());
        arrivals[0].reading()
    }
}

/// Complex-amplitude superposition of simultaneous arrivals.
///
/// Each arrival contributes `sqrt(intensity) · e^{i·(2π·radius·frequency
/// + phase_shift)}`; the combined intensity is the squared real part of
/// the resultant. Which payload the receiver perceives is sampled from
/// the per-arrival real magnitudes, so the returned reading is
/// non-deterministic per call unless the RNG is seeded.
#[derive(Clone, Debug)]
pub struct AmplitudeSuperposition<R = ChaCha8Rng> {
    rng: R,
}

impl AmplitudeSuperposition<ChaCha8Rng> {
    /// A superposition combiner with a deterministic, seeded RNG.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> AmplitudeSuperposition<R> {
    /// A superposition combiner driven by the given random source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> CombinePolicy for AmplitudeSuperposition<R> {
    fn combine(&mut self, arrivals: &[Wavefront]) -> FieldReading {
        debug_assert!(!arrivals.is_empty());

        // Project each complex term onto the real axis; only the real
        // resultant contributes to the observed intensity.
        let mut reals = Vec::with_capacity(arrivals.len());
        let mut resultant = 0.0;
        for wave in arrivals {
            let amplitude = wave.intensity().unwrap_or(0.0).max(0.0).sqrt();
            let phase = 2.0 * PI * wave.radius() * wave.frequency() + wave.phase_shift();
            let re = amplitude * phase.cos();
            resultant += re;
            reals.push(re);
        }
        let intensity = resultant * resultant;

        // Normalise |Re| into a distribution and sample the perceived
        // arrival. A set with no real mass has nothing to sample; the
        // first arrival's payload stands in.
        let total: f64 = reals.iter().map(|re| re.abs()).sum();
        let chosen = if total > 0.0 {
            let draw = self.rng.random::<f64>() * total;
            let mut cumulative = 0.0;
            let mut index = arrivals.len() - 1;
            for (i, re) in reals.iter().enumerate() {
                cumulative += re.abs();
                if draw < cumulative {
                    index = i;
                    break;
                }
            }
            index
        } else {
            0
        };
        let perceived = &arrivals[chosen];

        // A detection artifact, not a propagating entity: no frequency,
        // no phase, only the combined intensity and the sampled payload.
        FieldReading {
            intensity,
            frequency: 0.0,
            phase: 0.0,
            arrival_time: arrivals[0].surface_time(),
            source: perceived.source(),
            payload: perceived.payload().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::{Emission, ObjectId, Payload, Vec3};

    /// An aged wavefront with a chosen radius and phase shift.
    fn arrival(radius: f64, frequency: f64, power: f64, phase_shift: f64) -> Wavefront {
        let mut w = Wavefront::spawn(
            ObjectId(0),
            Vec3::ZERO,
            1.0,
            Emission::new(frequency, power, 0.0),
        );
        w.age_to(radius);
        w.phase_shift = phase_shift;
        w
    }

    /// A wavefront that has not left its source: zero radius, undefined
    /// intensity, zero sampling weight.
    fn unborn(payload: Payload) -> Wavefront {
        let mut w = Wavefront::spawn(ObjectId(9), Vec3::ZERO, 1.0, Emission::new(1.0, 1.0, 0.0));
        w.payload = payload;
        w
    }

    // ---------------------------------------------------------------
    // First-arrival policy
    // ---------------------------------------------------------------

    #[test]
    fn first_arrival_returns_the_head_unmodified() {
        let a = arrival(2.0, 1.0, 1.0, 0.0);
        let b = arrival(3.0, 5.0, 2.0, 0.0);
        let expected = a.intensity().unwrap();

        let reading = FirstArrival.combine(&[a, b]);
        assert_eq!(reading.intensity, expected);
        assert_eq!(reading.frequency, 1.0);
        assert_eq!(reading.source, Some(ObjectId(0)));
    }

    // ---------------------------------------------------------------
    // Amplitude superposition
    // ---------------------------------------------------------------

    #[test]
    fn equal_waves_in_phase_quadruple_the_intensity() {
        // radius 1, frequency 1: phase = 2π ≡ 0 for both terms.
        let a = arrival(1.0, 1.0, 1.0, 0.0);
        let b = arrival(1.0, 1.0, 1.0, 0.0);
        let single = a.intensity().unwrap();

        let mut combiner = AmplitudeSuperposition::seeded(7);
        let reading = combiner.combine(&[a, b]);
        assert!(
            (reading.intensity - 4.0 * single).abs() < 1e-9,
            "constructive interference should double the amplitude, got {} vs 4×{single}",
            reading.intensity,
        );
    }

    #[test]
    fn opposed_waves_cancel() {
        let a = arrival(1.0, 1.0, 1.0, 0.0);
        let b = arrival(1.0, 1.0, 1.0, PI);

        let mut combiner = AmplitudeSuperposition::seeded(7);
        let reading = combiner.combine(&[a, b]);
        assert!(
            reading.intensity.abs() < 1e-12,
            "destructive interference should cancel, got {}",
            reading.intensity,
        );
    }

    #[test]
    fn zero_weight_terms_are_never_sampled() {
        let silent = unborn(Payload::new("silent"));
        let mut audible = arrival(1.0, 1.0, 1.0, 0.0);
        audible.payload = Payload::new("audible");

        for seed in 0..16 {
            let mut combiner = AmplitudeSuperposition::seeded(seed);
            let reading = combiner.combine(&[silent.clone(), audible.clone()]);
            assert_eq!(
                reading.payload.downcast_ref::<&str>(),
                Some(&"audible"),
                "seed {seed} sampled the zero-weight arrival",
            );
        }
    }

    #[test]
    fn massless_set_falls_back_to_the_first_payload() {
        let a = unborn(Payload::new(1u8));
        let b = unborn(Payload::new(2u8));

        let mut combiner = AmplitudeSuperposition::seeded(3);
        let reading = combiner.combine(&[a, b]);
        assert_eq!(reading.intensity, 0.0);
        assert_eq!(reading.payload.downcast_ref::<u8>(), Some(&1));
    }

    #[test]
    fn seeded_sampling_replays() {
        let a = arrival(1.0, 1.0, 1.0, 0.0);
        let mut b = arrival(2.0, 1.0, 4.0, 0.0);
        b.source = Some(ObjectId(1));

        let run = |seed: u64| {
            let mut combiner = AmplitudeSuperposition::seeded(seed);
            (0..32)
                .map(|_| combiner.combine(&[a.clone(), b.clone()]).source)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
