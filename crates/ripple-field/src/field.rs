//! The spherical-wavefront field registry and its per-tick lifecycle.
//!
//! A [`Field`] owns, per tracked object, the list of wavefronts that
//! object has emitted, and drives one tick per [`update`](Field::update)
//! call:
//!
//! 1. poll every object for new emissions and spawn wavefronts,
//! 2. derive obstacle-reflected mirror wavefronts (a transient pool,
//!    re-derived from each still-growing parent every tick),
//! 3. age every wavefront to `now`,
//! 4. run the read-phase intersection sweep over both pools,
//! 5. hand each newly reached receiver the combined reading,
//! 6. retire wavefronts that stayed below the detectability threshold
//!    for two consecutive ticks.
//!
//! Step 4 is read-only over state committed by steps 1–3; distance
//! memos and list mutations are committed only after the sweep, so the
//! tick never interleaves mutation with in-flight intersection tests.

use crate::combine::{CombinePolicy, FirstArrival};
use crate::sweep;
use crate::wavefront::Wavefront;
use indexmap::IndexMap;
use ripple_core::{
    ConfigError, EnvironmentId, Face, FieldObject, Obstacle, ObjectId, RegistryError, TickReport,
    Vec3, WavefrontId,
};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Configuration for a [`Field`].
#[derive(Clone, Copy, Debug)]
pub struct FieldConfig {
    /// Propagation speed of emitted wavefronts. Must be finite and > 0.
    pub propagation_speed: f64,
    /// Intensity below which a wavefront is no longer detectable and
    /// becomes eligible for retirement. Must be finite and > 0.
    pub min_intensity: f64,
    /// Legacy single-plane mode: one global boundary face applied to
    /// every wavefront even without obstacles.
    pub reflection_plane: Option<Face>,
    /// Worker threads for the intersection sweep; 0 or 1 runs it on the
    /// calling thread.
    pub intersect_threads: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            propagation_speed: 1.0,
            min_intensity: 1e-10,
            reflection_plane: None,
            intersect_threads: 0,
        }
    }
}

/// One tracked object and the wavefronts it has emitted, in emission
/// order.
struct Membership {
    object: Box<dyn FieldObject>,
    wavefronts: Vec<Wavefront>,
}

/// The spherical-wavefront engine.
///
/// Created once per field and alive for the simulation's duration; it
/// is mutated only by its own per-tick [`update`](Field::update).
pub struct Field {
    speed: f64,
    min_intensity: f64,
    reflection_plane: Option<Face>,
    intersect_threads: usize,
    combine: Box<dyn CombinePolicy>,
    environment: Option<EnvironmentId>,
    next_object: u64,
    objects: IndexMap<ObjectId, Membership>,
    /// Memoized squared distance from each wavefront to each receiver
    /// as of the previous tick. Identity-keyed so entries die with
    /// their wavefront, without any graph teardown.
    last_distance_sq: HashMap<(WavefrontId, ObjectId), f64>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("speed", &self.speed)
            .field("min_intensity", &self.min_intensity)
            .field("reflection_plane", &self.reflection_plane)
            .field("intersect_threads", &self.intersect_threads)
            .field("environment", &self.environment)
            .field("next_object", &self.next_object)
            .field("object_count", &self.objects.len())
            .finish_non_exhaustive()
    }
}

impl Field {
    /// Build a field with the default first-arrival combine policy.
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        Self::with_policy(config, Box::new(FirstArrival))
    }

    /// Build a field with an injected combine policy.
    pub fn with_policy(
        config: FieldConfig,
        combine: Box<dyn CombinePolicy>,
    ) -> Result<Self, ConfigError> {
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
        Ok(Self {
            speed: config.propagation_speed,
            min_intensity: config.min_intensity,
            reflection_plane: config.reflection_plane,
            intersect_threads: config.intersect_threads,
            combine,
            environment: None,
            next_object: 0,
            objects: IndexMap::new(),
            last_distance_sq: HashMap::new(),
        })
    }

    /// Register a tracked object.
    ///
    /// The first registration binds the field to that object's
    /// environment; any later object from a different environment is
    /// rejected here, before any tick runs.
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
            Membership {
                object,
                wavefronts: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Remove a tracked object, returning it.
    ///
    /// The object's live wavefronts are dropped with it, along with
    /// every distance memo that mentions the object or its wavefronts.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Box<dyn FieldObject>> {
        let member = self.objects.shift_remove(&id)?;
        let mut dead: HashSet<WavefrontId> = HashSet::new();
        for wave in &member.wavefronts {
            dead.insert(wave.id());
            dead.extend(wave.mirror_ids());
        }
        self.last_distance_sq
            .retain(|&(wid, oid), _| oid != id && !dead.contains(&wid));
        Some(member.object)
    }

    /// Shared access to a registered object.
    pub fn object(&self, id: ObjectId) -> Option<&dyn FieldObject> {
        self.objects.get(&id).map(|m| m.object.as_ref())
    }

    /// Mutable access to a registered object.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut (dyn FieldObject + 'static)> {
        self.objects.get_mut(&id).map(|m| m.object.as_mut())
    }

    /// Number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// All live wavefronts, in registration and emission order.
    ///
    /// Exposes centers, radii and intensities so a renderer can draw
    /// the field; the engine itself has no rendering responsibility.
    pub fn wavefronts(&self) -> impl Iterator<Item = &Wavefront> + '_ {
        self.objects.values().flat_map(|m| m.wavefronts.iter())
    }

    /// Advance the field one tick to `now`.
    ///
    /// `obstacles` is read-only reflection geometry for this tick.
    pub fn update(&mut self, now: f64, obstacles: &[Obstacle]) -> TickReport {
        let mut report = TickReport::default();

        // 1. Poll emissions; spawn wavefronts at current positions.
        //    Invalid emissions are filtered, not errors.
        let mut seeds: Vec<(WavefrontId, ObjectId)> = Vec::new();
        for (&id, member) in self.objects.iter_mut() {
            let position = member.object.position();
            for emission in member.object.radiated_values() {
                if !emission.is_valid() {
                    continue;
                }
                let wave = Wavefront::spawn(id, position, self.speed, emission);
                seeds.push((wave.id(), id));
                member.wavefronts.push(wave);
                report.spawned += 1;
            }
        }
        // The source sits at distance zero from its own fresh sphere;
        // seeding the memo keeps it from detecting its own emission.
        for (wid, oid) in seeds {
            self.last_distance_sq.insert((wid, oid), 0.0);
        }

        // 2. Reflection pass. Recorded crossings re-derive their mirror
        //    from the parent's current shell; new crossings are tested
        //    against the nearest face per axis of each obstacle, plus
        //    the legacy global plane when configured.
        let mut mirrors: Vec<Wavefront> = Vec::new();
        let plane = self.reflection_plane;
        for member in self.objects.values_mut() {
            for wave in member.wavefronts.iter_mut() {
                mirrors.extend(wave.recorded_mirrors());
                let candidates: SmallVec<[Face; 4]> = obstacles
                    .iter()
                    .flat_map(|obstacle| nearest_faces(wave.center(), obstacle))
                    .chain(plane)
                    .collect();
                for face in candidates {
                    // Used faces fall outside the narrowed limits and
                    // test negative; only first-time crossings produce
                    // a mirror here.
                    if let Some(mirror) = wave.crosses_boundary(face) {
                        mirrors.push(mirror);
                    }
                }
            }
        }
        report.reflections = mirrors.len();

        // 3. Age both pools to `now`.
        for member in self.objects.values_mut() {
            for wave in member.wavefronts.iter_mut() {
                wave.age_to(now);
            }
        }
        for mirror in mirrors.iter_mut() {
            mirror.age_to(now);
        }

        // 4. Read phase: intersection sweep over both pools against the
        //    polled receiver positions.
        let positions: Vec<(ObjectId, Vec3)> = self
            .objects
            .iter()
            .map(|(&id, m)| (id, m.object.position()))
            .collect();
        let outcome = {
            let pool: Vec<&Wavefront> = self
                .objects
                .values()
                .flat_map(|m| m.wavefronts.iter())
                .chain(mirrors.iter())
                .collect();
            sweep::run(
                &pool,
                &positions,
                &self.last_distance_sq,
                self.intersect_threads,
            )
        };

        // Commit phase: distance memos first.
        for (key, dist_sq) in outcome.distances {
            self.last_distance_sq.insert(key, dist_sq);
        }

        // 5. Group arrivals per receiver (pool order preserved) and
        //    deliver the combined reading.
        report.arrivals = outcome.arrivals.len();
        let mut grouped: IndexMap<ObjectId, Vec<Wavefront>> = IndexMap::new();
        for (_, receiver, snapshot) in outcome.arrivals {
            grouped.entry(receiver).or_default().push(snapshot);
        }
        for (receiver, snapshots) in grouped {
            let reading = self.combine.combine(&snapshots);
            if let Some(member) = self.objects.get_mut(&receiver) {
                member.object.detect_field(&reading);
                report.deliveries += 1;
            }
        }

        // 6. Retirement sweep with one-tick hysteresis: a wavefront
        //    first seen below threshold is kept one more tick so every
        //    receiver gets a final chance to intersect it.
        let min_intensity = self.min_intensity;
        let mut dead: HashSet<WavefrontId> = HashSet::new();
        let mut retired = 0;
        for member in self.objects.values_mut() {
            member.wavefronts.retain_mut(|wave| {
                match wave.intensity() {
                    Some(intensity) if intensity < min_intensity => {
                        if wave.retire_pending() {
                            retired += 1;
                            dead.insert(wave.id());
                            dead.extend(wave.mirror_ids());
                            false
                        } else {
                            wave.retire_pending = true;
                            true
                        }
                    }
                    _ => true,
                }
            });
        }
        report.retired = retired;
        if !dead.is_empty() {
            self.last_distance_sq
                .retain(|&(wid, _), _| !dead.contains(&wid));
        }
        report.live = self.objects.values().map(|m| m.wavefronts.len()).sum();

        report
    }
}

/// Reduce an obstacle's faces to the single nearest boundary per axis,
/// as seen from `center`; ties go to the face listed first.
fn nearest_faces(center: Vec3, obstacle: &Obstacle) -> SmallVec<[Face; 3]> {
    let mut selected: [Option<(Face, f64)>; 3] = [None; 3];
    for face in &obstacle.faces {
        let depth = (face.offset - center.axis(face.axis)).abs();
        let slot = &mut selected[face.axis.index()];
        match slot {
            Some((_, best)) if *best <= depth => {}
            _ => *slot = Some((*face, depth)),
        }
    }
    selected
        .into_iter()
        .flatten()
        .map(|(face, _)| face)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::Axis;

    #[test]
    fn config_validation() {
        assert!(Field::new(FieldConfig::default()).is_ok());

        let err = Field::new(FieldConfig {
            propagation_speed: 0.0,
            ..FieldConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPropagationSpeed { .. }));

        let err = Field::new(FieldConfig {
            min_intensity: f64::NAN,
            ..FieldConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMinIntensity { .. }));
    }

    #[test]
    fn nearest_face_per_axis_reduction() {
        let obstacle = Obstacle::new(vec![
            Face::new(Axis::X, 5.0),
            Face::new(Axis::X, 2.0),
            Face::new(Axis::X, -8.0),
            Face::new(Axis::Y, 1.0),
        ]);
        let faces = nearest_faces(Vec3::ZERO, &obstacle);
        assert_eq!(faces.len(), 2);
        assert!(faces.contains(&Face::new(Axis::X, 2.0)));
        assert!(faces.contains(&Face::new(Axis::Y, 1.0)));
    }

    #[test]
    fn nearest_face_tie_keeps_the_first() {
        let obstacle = Obstacle::new(vec![Face::new(Axis::X, 2.0), Face::new(Axis::X, -2.0)]);
        let faces = nearest_faces(Vec3::ZERO, &obstacle);
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0], Face::new(Axis::X, 2.0));
    }
}
