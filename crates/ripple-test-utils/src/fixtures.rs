//! Reusable field-object and collision fixtures.
//!
//! Three standard collaborators for engine testing:
//!
//! - [`ScriptedEmitter`] — radiates whatever its shared queue holds.
//! - [`RecordingReceiver`] — passive participant logging every reading.
//! - [`StaticBackend`] — hand-built collision world of spheres and
//!   axis-aligned planes for the ray-cast engine.
//!
//! Emitters and receivers share state with the test through
//! `Arc<Mutex<_>>` handles, so tests keep driving and observing objects
//! after moving them into a registry.

use ripple_core::{
    Axis, Emission, Emissions, EnvironmentId, FieldObject, FieldReading, ObjectId, Vec3,
};
use ripple_ray::{CollisionBackend, Contact, GeomId};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared queue of emissions a [`ScriptedEmitter`] drains when polled.
pub type EmissionQueue = Arc<Mutex<VecDeque<Emission>>>;

/// Create an empty emission queue.
pub fn new_emission_queue() -> EmissionQueue {
    Arc::new(Mutex::new(VecDeque::new()))
}

/// Shared log of the readings a [`RecordingReceiver`] observed.
pub type ReadingLog = Arc<Mutex<Vec<FieldReading>>>;

/// Create an empty reading log.
pub fn new_reading_log() -> ReadingLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A stationary object that radiates whatever its queue holds.
///
/// Also records every reading it observes, so tests can use a single
/// fixture as both transmitter and receiver.
pub struct ScriptedEmitter {
    environment: EnvironmentId,
    position: Vec3,
    queue: EmissionQueue,
    readings: ReadingLog,
}

impl ScriptedEmitter {
    /// An emitter at `position`, returning the queue handle used to
    /// inject emissions from the test.
    pub fn new(environment: EnvironmentId, position: Vec3) -> (Self, EmissionQueue, ReadingLog) {
        let queue = new_emission_queue();
        let readings = new_reading_log();
        (
            Self {
                environment,
                position,
                queue: queue.clone(),
                readings: readings.clone(),
            },
            queue,
            readings,
        )
    }
}

impl FieldObject for ScriptedEmitter {
    fn environment(&self) -> EnvironmentId {
        self.environment
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn radiated_values(&mut self) -> Emissions {
        self.queue.lock().unwrap().drain(..).collect()
    }

    fn detect_field(&mut self, reading: &FieldReading) -> bool {
        self.readings.lock().unwrap().push(reading.clone());
        true
    }
}

/// A stationary, passive participant that logs every reading.
pub struct RecordingReceiver {
    environment: EnvironmentId,
    position: Vec3,
    readings: ReadingLog,
}

impl RecordingReceiver {
    /// A receiver at `position`, returning the log handle the test
    /// observes.
    pub fn new(environment: EnvironmentId, position: Vec3) -> (Self, ReadingLog) {
        let readings = new_reading_log();
        (
            Self {
                environment,
                position,
                readings: readings.clone(),
            },
            readings,
        )
    }
}

impl FieldObject for RecordingReceiver {
    fn environment(&self) -> EnvironmentId {
        self.environment
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn detect_field(&mut self, reading: &FieldReading) -> bool {
        self.readings.lock().unwrap().push(reading.clone());
        true
    }
}

/// Shape of one piece of static collision geometry.
#[derive(Clone, Copy, Debug)]
pub enum StaticShape {
    /// A sphere, e.g. a receiver's reception sphere.
    Sphere {
        /// Sphere center.
        center: Vec3,
        /// Sphere radius.
        radius: f64,
    },
    /// An infinite plane perpendicular to `axis` at `offset`.
    Plane {
        /// Axis the plane is perpendicular to.
        axis: Axis,
        /// Plane offset along that axis.
        offset: f64,
    },
}

struct StaticGeom {
    id: GeomId,
    shape: StaticShape,
    owner: Option<ObjectId>,
    obstacle: bool,
}

/// A hand-built collision world of spheres and axis-aligned planes.
///
/// Stands in for the external rigid-body broad-phase: reception spheres
/// are registered per receiver with [`add_reception_sphere`]
/// (re-registered by the test whenever a receiver moves), obstacle
/// surfaces with [`add_obstacle_plane`].
///
/// [`add_reception_sphere`]: StaticBackend::add_reception_sphere
/// [`add_obstacle_plane`]: StaticBackend::add_obstacle_plane
#[derive(Default)]
pub struct StaticBackend {
    geoms: Vec<StaticGeom>,
    next_geom: u64,
}

impl StaticBackend {
    /// An empty collision world.
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, shape: StaticShape, owner: Option<ObjectId>, obstacle: bool) -> GeomId {
        let id = GeomId(self.next_geom);
        self.next_geom += 1;
        self.geoms.push(StaticGeom {
            id,
            shape,
            owner,
            obstacle,
        });
        id
    }

    /// Register a reception sphere owned by `owner`.
    pub fn add_reception_sphere(&mut self, owner: ObjectId, center: Vec3, radius: f64) -> GeomId {
        self.add(StaticShape::Sphere { center, radius }, Some(owner), false)
    }

    /// Register an obstacle plane.
    pub fn add_obstacle_plane(&mut self, axis: Axis, offset: f64) -> GeomId {
        self.add(StaticShape::Plane { axis, offset }, None, true)
    }

    /// Remove every registered geometry.
    pub fn clear(&mut self) {
        self.geoms.clear();
    }

    /// Distance along the ray to the first intersection with `shape`,
    /// if within `length`.
    fn hit_distance(shape: StaticShape, origin: Vec3, direction: Vec3, length: f64) -> Option<f64> {
        match shape {
            StaticShape::Plane { axis, offset } => {
                let d = direction.axis(axis);
                if d == 0.0 {
                    return None;
                }
                let t = (offset - origin.axis(axis)) / d;
                (t > 0.0 && t <= length).then_some(t)
            }
            StaticShape::Sphere { center, radius } => {
                // |origin + t·direction - center|² = radius²
                let oc = origin - center;
                let b = 2.0 * oc.dot(direction);
                let c = oc.norm_sq() - radius * radius;
                let discriminant = b * b - 4.0 * c;
                if discriminant < 0.0 {
                    return None;
                }
                let sqrt_d = discriminant.sqrt();
                let near = (-b - sqrt_d) / 2.0;
                let far = (-b + sqrt_d) / 2.0;
                let t = if near > 0.0 { near } else { far };
                (t > 0.0 && t <= length).then_some(t)
            }
        }
    }

    fn normal_at(shape: StaticShape, point: Vec3, direction: Vec3) -> Vec3 {
        match shape {
            StaticShape::Plane { axis, offset: _ } => {
                // Face the incoming ray.
                let mut normal = Vec3::ZERO;
                *normal.axis_mut(axis) = if direction.axis(axis) > 0.0 { -1.0 } else { 1.0 };
                normal
            }
            StaticShape::Sphere { center, .. } => {
                (point - center).normalized().unwrap_or(Vec3::ZERO)
            }
        }
    }
}

impl CollisionBackend for StaticBackend {
    fn cast(&self, origin: Vec3, direction: Vec3, length: f64) -> Vec<Contact> {
        let mut contacts: Vec<Contact> = self
            .geoms
            .iter()
            .filter_map(|geom| {
                Self::hit_distance(geom.shape, origin, direction, length).map(|depth| {
                    let position = origin + direction.scale(depth);
                    Contact {
                        geom: geom.id,
                        position,
                        normal: Self::normal_at(geom.shape, position, direction),
                        depth,
                    }
                })
            })
            .collect();
        contacts.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        contacts
    }

    fn owner(&self, geom: GeomId) -> Option<ObjectId> {
        self.geoms.iter().find(|g| g.id == geom)?.owner
    }

    fn is_obstacle(&self, geom: GeomId) -> bool {
        self.geoms.iter().any(|g| g.id == geom && g.obstacle)
    }
}
