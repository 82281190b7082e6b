//! The external collision collaborator contract.
//!
//! Ray/geometry intersection belongs to the surrounding environment's
//! collision broad-phase, not to this crate. The engine hands the
//! backend one ray at a time and interprets the returned contacts by
//! resolving each geometry handle: handles owned by a tracked object
//! are reception hits, handles flagged as obstacles reflect the ray,
//! anything else is ignored.
//!
//! The embedding is expected to keep a reception sphere registered per
//! tracked object at its current position (see
//! [`RayField::reception_radius`](crate::RayField::reception_radius)).

use ripple_core::{ObjectId, Vec3};
use std::fmt;

/// Opaque handle to a piece of external collision geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeomId(pub u64);

impl fmt::Display for GeomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GeomId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// One ray/geometry contact reported by the backend.
#[derive(Clone, Debug)]
pub struct Contact {
    /// The geometry that was struck.
    pub geom: GeomId,
    /// Contact point in world space.
    pub position: Vec3,
    /// Surface normal at the contact point.
    pub normal: Vec3,
    /// Distance along the ray from its origin to the contact — how far
    /// the ray penetrates the scene before striking this surface.
    pub depth: f64,
}

/// Collision and identity resolution supplied by the environment.
///
/// `direction` passed to [`cast`](CollisionBackend::cast) is always
/// unit length; contacts must be returned nearest first.
pub trait CollisionBackend {
    /// Cast a ray against the world geometry.
    fn cast(&self, origin: Vec3, direction: Vec3, length: f64) -> Vec<Contact>;

    /// Resolve a geometry handle to the tracked object owning it, if
    /// any (e.g. its reception sphere or body geometry).
    fn owner(&self, geom: GeomId) -> Option<ObjectId>;

    /// Whether the geometry handle is flagged as a reflecting obstacle.
    fn is_obstacle(&self, geom: GeomId) -> bool;
}
