//! Ripple: agent-emitted field propagation with reflection and
//! interference.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the Ripple sub-crates. For most users, adding `ripple` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ripple::prelude::*;
//!
//! // A beacon that radiates one burst at t=0.
//! struct Beacon {
//!     sent: bool,
//! }
//! impl FieldObject for Beacon {
//!     fn environment(&self) -> EnvironmentId { EnvironmentId(0) }
//!     fn position(&self) -> Vec3 { Vec3::ZERO }
//!     fn radiated_values(&mut self) -> Emissions {
//!         let mut out = Emissions::new();
//!         if !self.sent {
//!             self.sent = true;
//!             out.push(Emission::new(1.0, 1.0, 0.0));
//!         }
//!         out
//!     }
//! }
//!
//! // A passive listener three units away.
//! struct Listener;
//! impl FieldObject for Listener {
//!     fn environment(&self) -> EnvironmentId { EnvironmentId(0) }
//!     fn position(&self) -> Vec3 { Vec3::new(3.0, 0.0, 0.0) }
//!     fn detect_field(&mut self, _reading: &FieldReading) -> bool { true }
//! }
//!
//! let mut field = Field::new(FieldConfig::default()).unwrap();
//! field.add_object(Box::new(Beacon { sent: false })).unwrap();
//! field.add_object(Box::new(Listener)).unwrap();
//!
//! let mut deliveries = 0;
//! for tick in 1..=5 {
//!     deliveries += field.update(f64::from(tick), &[]).deliveries;
//! }
//! // The wavefront sweeps past the listener exactly once, at t=3.
//! assert_eq!(deliveries, 1);
//! assert_eq!(field.wavefronts().count(), 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ripple-core` | IDs, vectors, payloads, traits, errors |
//! | [`field`] | `ripple-field` | Spherical engine and combine policies |
//! | [`ray`] | `ripple-ray` | Ray-cast engine and collision contract |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`ripple-core`).
///
/// Contains the [`types::FieldObject`] collaborator contract, obstacle
/// faces, payloads, readings, reports, and error types.
pub use ripple_core as types;

/// Spherical-wavefront engine (`ripple-field`).
///
/// The [`field::Field`] registry, the [`field::Wavefront`] entity, and
/// the [`field::CombinePolicy`] strategies.
pub use ripple_field as field;

/// Ray-cast engine (`ripple-ray`).
///
/// The [`ray::RayField`] variant and the [`ray::CollisionBackend`]
/// collaborator contract.
pub use ripple_ray as ray;

/// Common imports for typical Ripple usage.
///
/// ```rust
/// use ripple::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use ripple_core::{
        Axis, Emission, Emissions, EnvironmentId, Face, FieldObject, FieldReading, Obstacle,
        ObjectId, Payload, TickReport, Vec3, WavefrontId,
    };

    // Errors
    pub use ripple_core::{ConfigError, RegistryError};

    // Spherical engine
    pub use ripple_field::{
        AmplitudeSuperposition, CombinePolicy, Field, FieldConfig, FirstArrival, Wavefront,
    };

    // Ray-cast engine
    pub use ripple_ray::{CollisionBackend, Contact, GeomId, Ray, RayField, RayFieldConfig};
}
