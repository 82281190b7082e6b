//! Core types and traits for the Ripple field-propagation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the spherical and ray-cast engines: 3-D
//! vector math, strongly-typed IDs, opaque payloads, the tracked-object
//! collaborator contract, obstacle boundary descriptors, the delivered
//! [`FieldReading`] value, per-tick counters, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod object;
pub mod obstacle;
pub mod payload;
pub mod reading;
pub mod report;
pub mod vec3;

pub use error::{ConfigError, RegistryError};
pub use id::{EnvironmentId, ObjectId, WavefrontId};
pub use object::{Emission, Emissions, FieldObject};
pub use obstacle::{Face, Obstacle};
pub use payload::Payload;
pub use reading::FieldReading;
pub use report::TickReport;
pub use vec3::{wrap_phase, Axis, Vec3};
