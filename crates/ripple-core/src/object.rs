//! The tracked-object collaborator contract.
//!
//! A [`FieldObject`] is anything a field registry tracks: an agent that
//! radiates, a passive receiver, or both. The engine only asks for a
//! position, polls for new emissions, and delivers readings; scheduling,
//! dynamics, and device logic stay on the caller's side of the trait.

use crate::id::EnvironmentId;
use crate::payload::Payload;
use crate::reading::FieldReading;
use crate::vec3::Vec3;
use smallvec::SmallVec;

/// One radiated burst reported by a tracked object.
#[derive(Clone, Debug)]
pub struct Emission {
    /// Oscillation frequency of the burst. Must be finite and > 0 to
    /// spawn a wavefront.
    pub frequency: f64,
    /// Total radiated power of the burst. Must be finite and > 0 to
    /// spawn a wavefront.
    pub power: f64,
    /// Simulation time at which the burst left the source.
    pub time: f64,
    /// Opaque value carried with the burst, unchanged through copies
    /// and reflections.
    pub payload: Payload,
}

impl Emission {
    /// A payload-less emission.
    pub fn new(frequency: f64, power: f64, time: f64) -> Self {
        Self {
            frequency,
            power,
            time,
            payload: Payload::none(),
        }
    }

    /// Attach a payload to this emission.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Whether this emission spawns a wavefront.
    ///
    /// Entries with non-positive (or non-finite) frequency or power are
    /// silently discarded — a filtering rule, not an error.
    pub fn is_valid(&self) -> bool {
        self.frequency.is_finite()
            && self.frequency > 0.0
            && self.power.is_finite()
            && self.power > 0.0
    }
}

/// The emissions reported by one poll of a tracked object.
pub type Emissions = SmallVec<[Emission; 2]>;

/// A tracked participant in a field.
///
/// # Contract
///
/// - `position()` reports the object's current location; it is polled
///   once per tick and must be side-effect free.
/// - `radiated_values()` drains any bursts emitted since the last poll.
///   The default is a passive participant that never radiates.
/// - `detect_field()` receives the combined reading for each tick on
///   which the object is newly reached by one or more wavefronts. The
///   return value reports whether the reading was handled; unhandled
///   readings are tolerated and not redelivered.
///
/// # Object safety
///
/// This trait is object-safe; registries store participants as
/// `Box<dyn FieldObject>`.
pub trait FieldObject: Send {
    /// The physical space this object lives in.
    fn environment(&self) -> EnvironmentId;

    /// Current position in 3-D space.
    fn position(&self) -> Vec3;

    /// Drain bursts radiated since the last poll.
    fn radiated_values(&mut self) -> Emissions {
        Emissions::new()
    }

    /// Deliver a field reading; returns whether it was handled.
    fn detect_field(&mut self, reading: &FieldReading) -> bool {
        let _ = reading;
        false
    }
}
