//! Ray-cast field variant with bounded obstacle reflection.
//!
//! The alternate engine mode for scenarios that need directional
//! resolution: emission events are discretized into eight cube-corner
//! rays, intersections run through an external [`CollisionBackend`],
//! and obstacle contacts re-emit reflected rays for a bounded number of
//! bounce rounds.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod backend;
pub mod ray_field;

pub use backend::{CollisionBackend, Contact, GeomId};
pub use ray_field::{Ray, RayField, RayFieldConfig};
