//! Spherical-wavefront propagation, reflection and interference engine.
//!
//! The [`Field`] registry tracks objects and the wavefronts they emit,
//! and advances them one tick per [`Field::update`] call: spawning from
//! polled emissions, deriving obstacle reflections, aging, edge-
//! triggered arrival detection, interference combination, and
//! threshold-based retirement with one tick of hysteresis.
//!
//! # Tick order
//!
//! 1. spawn — poll every object, filter invalid emissions
//! 2. reflect — derive transient mirror wavefronts per obstacle face
//! 3. age — grow every shell to `now`
//! 4. sweep — read-only intersection pass (optionally threaded)
//! 5. deliver — combine per-receiver arrivals, call `detect_field`
//! 6. retire — drop wavefronts two ticks below the threshold

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod combine;
pub mod field;
mod sweep;
pub mod wavefront;

pub use combine::{AmplitudeSuperposition, CombinePolicy, FirstArrival};
pub use field::{Field, FieldConfig};
pub use wavefront::Wavefront;
