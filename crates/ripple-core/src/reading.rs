//! The measurement delivered to receivers.

use crate::id::ObjectId;
use crate::payload::Payload;

/// A field measurement delivered to a receiver's
/// [`detect_field`](crate::FieldObject::detect_field).
///
/// Produced by the spherical engine from an arrival-time wavefront
/// snapshot (or an interference-combined set of them), and by the
/// ray-cast engine from the first recorded ray hit. A reading is a
/// detection artifact: it does not propagate and holds no geometry.
#[derive(Clone, Debug)]
pub struct FieldReading {
    /// Power per unit area at the receiver at the moment of arrival.
    pub intensity: f64,
    /// Oscillation frequency of the perceived signal; zero for
    /// interference-combined artifacts.
    pub frequency: f64,
    /// Oscillation phase at the receiver, wrapped to `[-π, π)`; zero
    /// for combined artifacts.
    pub phase: f64,
    /// Simulation time at which the signal reached the receiver.
    pub arrival_time: f64,
    /// The emitting object, when the reading is attributable to one.
    pub source: Option<ObjectId>,
    /// Payload of the perceived emission.
    pub payload: Payload,
}
