//! The ray-cast field engine.
//!
//! Discretizes each emission event into a fixed set of eight rays
//! (cube-corner directions) instead of testing full spheres — the mode
//! of choice when directional resolution matters or spherical
//! intersection testing is too costly. Obstacle reflection is iterative
//! and bounded: each bounce round re-emits rays off obstacle contacts,
//! up to `max_bounces` rounds.
//!
//! Emission bookkeeping is by `(time, power)` pair per source; a pair
//! is culled once its inverse-square intensity at the current range
//! falls below the detectability threshold.

use crate::backend::CollisionBackend;
use indexmap::IndexMap;
use ripple_core::{
    ConfigError, EnvironmentId, FieldObject, FieldReading, ObjectId, Payload, RegistryError,
    TickReport, Vec3,
};
use std::collections::HashSet;
use std::f64::consts::PI;

/// The eight cube-corner emission directions, unit length.
const RAY_DIRECTIONS: [Vec3; 8] = {
    const C: f64 = 0.577_350_269_189_625_8; // 1/√3
    [
        Vec3::new(C, C, C),
        Vec3::new(-C, -C, -C),
        Vec3::new(C, C, -C),
        Vec3::new(-C, -C, C),
        Vec3::new(C, -C, C),
        Vec3::new(-C, C, -C),
        Vec3::new(-C, C, C),
        Vec3::new(C, -C, -C),
    ]
};

/// Configuration for a [`RayField`].
#[derive(Clone, Copy, Debug)]
pub struct RayFieldConfig {
    /// Propagation speed of emitted rays. Must be finite and > 0.
    pub propagation_speed: f64,
    /// Intensity below which an emission is culled. Must be finite and
    /// > 0.
    pub min_intensity: f64,
    /// Radius of the reception sphere the embedding keeps registered
    /// per tracked object. Must be finite and > 0.
    pub reception_radius: f64,
    /// Bounce rounds per tick: the first round casts the primary rays,
    /// each further round casts the rays reflected in the previous one.
    pub max_bounces: usize,
}

impl Default for RayFieldConfig {
    fn default() -> Self {
        Self {
            propagation_speed: 1.0,
            min_intensity: 1e-10,
            reception_radius: 0.1,
            max_bounces: 2,
        }
    }
}

/// A single directed ray in flight during one tick.
#[derive(Clone, Debug)]
pub struct Ray {
    /// Start of the ray: the source position, or a reflection contact.
    pub origin: Vec3,
    /// Unit direction of travel.
    pub direction: Vec3,
    /// Remaining travel distance this tick.
    pub length: f64,
    /// Power of the originating emission.
    pub power: f64,
    /// Emission time of the originating burst.
    pub emitted_at: f64,
    /// The emitting object; its own rays never reach it.
    pub source: ObjectId,
    /// Distance already covered by earlier bounces.
    pub travelled: f64,
    /// Per-tick ordinal of the originating burst, for hit dedup.
    burst: usize,
}

/// The first recorded hit for one receiver.
struct Hit {
    source: ObjectId,
    power: f64,
    emitted_at: f64,
    distance: f64,
}

/// One tracked object and its live `(time, power)` emissions.
struct RaySource {
    object: Box<dyn FieldObject>,
    emissions: Vec<(f64, f64)>,
}

/// The ray-cast engine.
///
/// Mutually exclusive with the spherical engine: the two reflection
/// models (contact-normal re-emission here, per-axis reflection limits
/// there) are alternate modes, not a shared implementation.
pub struct RayField {
    speed: f64,
    min_intensity: f64,
    reception_radius: f64,
    max_bounces: usize,
    environment: Option<EnvironmentId>,
    next_object: u64,
    objects: IndexMap<ObjectId, RaySource>,
    /// Rays produced during the most recent tick — primaries, cast
    /// bounces, and the final uncast generation — kept for display.
    last_rays: Vec<Ray>,
}

impl std::fmt::Debug for RayField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayField")
            .field("speed", &self.speed)
            .field("min_intensity", &self.min_intensity)
            .field("reception_radius", &self.reception_radius)
            .field("max_bounces", &self.max_bounces)
            .field("environment", &self.environment)
            .field("next_object", &self.next_object)
            .field("object_count", &self.objects.len())
            .finish_non_exhaustive()
    }
}

impl RayField {
    /// Build a ray field from a validated configuration.
    pub fn new(config: RayFieldConfig) -> Result<Self, ConfigError> {
        if !config.propagation_speed.is_finite() || config.propagation_speed <= 0.0 {
            return Err(ConfigError::InvalidPropagationSpeed {
                value: config.propagation_speed,
            });
        }
        if !config.min_intensity.is_finite() || config.min_intensity <= 0.0 {
            return Err(ConfigError::InvalidMinIntensity {
                value: config.min_intensity,
            });
        }
        if !config.reception_radius.is_finite() || config.reception_radius <= 0.0 {
            return Err(ConfigError::InvalidReceptionRadius {
                value: config.reception_radius,
            });
        }
        Ok(Self {
            speed: config.propagation_speed,
            min_intensity: config.min_intensity,
            reception_radius: config.reception_radius,
            max_bounces: config.max_bounces,
            environment: None,
            next_object: 0,
            objects: IndexMap::new(),
            last_rays: Vec::new(),
        })
    }

    /// Register a tracked object; rejects environment mismatches
    /// before any tick runs.
    pub fn add_object(&mut self, object: Box<dyn FieldObject>) -> Result<ObjectId, RegistryError> {
        let environment = object.environment();
        match self.environment {
            None => self.environment = Some(environment),
            Some(expected) if expected != environment => {
                return Err(RegistryError::EnvironmentMismatch {
                    expected,
                    found: environment,
                });
            }
            Some(_) => {}
        }
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.insert(
            id,
            RaySource {
                object,
                emissions: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Remove a tracked object, returning it.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Box<dyn FieldObject>> {
        self.objects.shift_remove(&id).map(|s| s.object)
    }

    /// Shared access to a registered object.
    pub fn object(&self, id: ObjectId) -> Option<&dyn FieldObject> {
        self.objects.get(&id).map(|s| s.object.as_ref())
    }

    /// Mutable access to a registered object.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut (dyn FieldObject + 'static)> {
        self.objects.get_mut(&id).map(|s| s.object.as_mut())
    }

    /// Number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Radius of the reception sphere the embedding keeps registered
    /// per object.
    pub fn reception_radius(&self) -> f64 {
        self.reception_radius
    }

    /// Rays produced during the most recent tick, for display.
    pub fn rays(&self) -> impl Iterator<Item = &Ray> + '_ {
        self.last_rays.iter()
    }

    /// Advance the field one tick to `now`.
    pub fn update(&mut self, now: f64, backend: &dyn CollisionBackend) -> TickReport {
        let mut report = TickReport::default();

        // Cull emissions that decayed below the threshold, then poll
        // for new ones (invalid entries filtered, not errors).
        let speed = self.speed;
        let min_intensity = self.min_intensity;
        for source in self.objects.values_mut() {
            let before = source.emissions.len();
            source.emissions.retain(|&(time, power)| {
                let range = speed * (now - time);
                range <= 0.0 || power / (4.0 * PI * range * range) >= min_intensity
            });
            report.retired += before - source.emissions.len();

            for emission in source.object.radiated_values() {
                if !emission.is_valid() {
                    continue;
                }
                source.emissions.push((emission.time, emission.power));
            }
            report.live += source.emissions.len();
        }

        // Spawn eight rays per live emission.
        let mut in_flight: Vec<Ray> = Vec::new();
        let mut burst = 0;
        for (&id, source) in self.objects.iter() {
            let origin = source.object.position();
            for &(time, power) in &source.emissions {
                let length = speed * (now - time);
                if length > 0.0 {
                    for direction in RAY_DIRECTIONS {
                        in_flight.push(Ray {
                            origin,
                            direction,
                            length,
                            power,
                            emitted_at: time,
                            source: id,
                            travelled: 0.0,
                            burst,
                        });
                    }
                }
                burst += 1;
            }
        }
        report.spawned = in_flight.len();
        self.last_rays.clear();

        // Bounce rounds: record reception hits, re-emit off obstacles.
        let mut hits: IndexMap<ObjectId, Hit> = IndexMap::new();
        let mut seen: HashSet<(ObjectId, usize)> = HashSet::new();
        for _round in 0..self.max_bounces {
            if in_flight.is_empty() {
                break;
            }
            let mut reflected: Vec<Ray> = Vec::new();
            for ray in &in_flight {
                for contact in backend.cast(ray.origin, ray.direction, ray.length) {
                    if let Some(owner) = backend.owner(contact.geom) {
                        if owner == ray.source {
                            continue;
                        }
                        // At most the first ray of a burst per receiver.
                        if !seen.insert((owner, ray.burst)) {
                            continue;
                        }
                        report.arrivals += 1;
                        hits.entry(owner).or_insert(Hit {
                            source: ray.source,
                            power: ray.power,
                            emitted_at: ray.emitted_at,
                            distance: ray.travelled + contact.depth,
                        });
                    } else if backend.is_obstacle(contact.geom) {
                        // Reflect off the contact normal, shortened by
                        // the distance already penetrated.
                        let length = ray.length - contact.depth;
                        if length <= 0.0 {
                            continue;
                        }
                        let Some(direction) = contact.normal.normalized() else {
                            continue;
                        };
                        reflected.push(Ray {
                            origin: contact.position,
                            direction,
                            length,
                            power: ray.power,
                            emitted_at: ray.emitted_at,
                            source: ray.source,
                            travelled: ray.travelled + contact.depth,
                            burst: ray.burst,
                        });
                    }
                }
            }
            report.reflections += reflected.len();
            self.last_rays.append(&mut in_flight);
            in_flight = reflected;
        }
        self.last_rays.append(&mut in_flight);

        // Deliver each receiver's first recorded hit.
        for (receiver, hit) in hits {
            if hit.distance <= 0.0 {
                continue;
            }
            let reading = FieldReading {
                intensity: hit.power / (4.0 * PI * hit.distance * hit.distance),
                frequency: 0.0,
                phase: 0.0,
                arrival_time: hit.emitted_at + hit.distance / speed,
                source: Some(hit.source),
                payload: Payload::none(),
            };
            if let Some(source) = self.objects.get_mut(&receiver) {
                source.object.detect_field(&reading);
                report.deliveries += 1;
            }
        }

        report
    }
}
