//! The expanding spherical wavefront entity.
//!
//! A [`Wavefront`] represents the energy of one emission event: a
//! sphere centered at the source's position at the instant of emission.
//! The center never moves; only the radius grows at the field's
//! propagation speed. Between ticks the sphere sweeps a shell
//! (`last_radius..radius`), and both arrival detection and boundary
//! crossing are defined against that shell.
//!
//! Reflection bookkeeping: the first time the shell reaches a boundary
//! face, the wavefront records a [`Crossing`] — the mirrored center, a
//! stable child id, and the child's frozen intensity factor and phase.
//! Every subsequent tick the registry re-derives a transient mirror
//! wavefront from the record and the parent's current shell, until the
//! parent retires. Mirrors are never retained across ticks and never
//! reflect again themselves.

use ripple_core::{wrap_phase, Emission, Face, FieldReading, ObjectId, Payload, Vec3, WavefrontId};
use smallvec::SmallVec;
use std::f64::consts::PI;

/// Open interval of boundary offsets still allowed to reflect, per axis.
pub(crate) type ReflectionLimits = [(f64, f64); 3];

const OPEN_LIMITS: ReflectionLimits = [
    (f64::NEG_INFINITY, f64::INFINITY),
    (f64::NEG_INFINITY, f64::INFINITY),
    (f64::NEG_INFINITY, f64::INFINITY),
];

/// Record of a boundary face a wavefront has crossed.
///
/// The child id is allocated once, at crossing time, so the transient
/// mirror re-derived from this record keeps a stable identity across
/// ticks (its memoized-distance entries stay valid).
#[derive(Clone, Debug)]
pub(crate) struct Crossing {
    mirror_center: Vec3,
    child_id: WavefrontId,
    child_factor: f64,
    child_phase: f64,
    child_limits: ReflectionLimits,
}

/// An expanding spherical wavefront.
#[derive(Clone, Debug)]
pub struct Wavefront {
    pub(crate) id: WavefrontId,
    pub(crate) source: Option<ObjectId>,
    pub(crate) center: Vec3,
    pub(crate) radius: f64,
    pub(crate) last_radius: f64,
    pub(crate) intensity: Option<f64>,
    pub(crate) intensity_factor: f64,
    pub(crate) frequency: f64,
    pub(crate) total_power: f64,
    pub(crate) speed: f64,
    pub(crate) emitted_at: f64,
    pub(crate) phase_shift: f64,
    pub(crate) payload: Payload,
    pub(crate) origin: Option<WavefrontId>,
    pub(crate) retire_pending: bool,
    pub(crate) reflection_limits: ReflectionLimits,
    pub(crate) crossings: SmallVec<[Crossing; 2]>,
}

impl Wavefront {
    /// Create a wavefront for a freshly polled emission.
    ///
    /// The caller has already filtered invalid emissions; the wavefront
    /// starts with zero radius and undefined intensity (it has not yet
    /// left its source).
    pub(crate) fn spawn(
        source: ObjectId,
        center: Vec3,
        speed: f64,
        emission: Emission,
    ) -> Self {
        Self {
            id: WavefrontId::next(),
            source: Some(source),
            center,
            radius: 0.0,
            last_radius: 0.0,
            intensity: None,
            intensity_factor: 1.0,
            frequency: emission.frequency,
            total_power: emission.power,
            speed,
            emitted_at: emission.time,
            phase_shift: 0.0,
            payload: emission.payload,
            origin: None,
            retire_pending: false,
            reflection_limits: OPEN_LIMITS,
            crossings: SmallVec::new(),
        }
    }

    /// Stable identity of this wavefront.
    pub fn id(&self) -> WavefrontId {
        self.id
    }

    /// The object that emitted this wavefront, when attributable.
    pub fn source(&self) -> Option<ObjectId> {
        self.source
    }

    /// Fixed center: the source's position at the instant of emission.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Current radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Radius as of the previous tick; always `<= radius` after aging.
    pub fn last_radius(&self) -> f64 {
        self.last_radius
    }

    /// Power per unit area at the current radius, once the wavefront
    /// has left its source.
    pub fn intensity(&self) -> Option<f64> {
        self.intensity
    }

    /// Remaining share of the emission's energy carried by this
    /// wavefront; reduced by reflections.
    pub fn intensity_factor(&self) -> f64 {
        self.intensity_factor
    }

    /// Oscillation frequency of the emission.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Total radiated power of the emission.
    pub fn total_power(&self) -> f64 {
        self.total_power
    }

    /// Simulation time of the emission event.
    pub fn emitted_at(&self) -> f64 {
        self.emitted_at
    }

    /// Propagation speed frozen from the field at spawn time.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Accumulated phase offset; π per reflection.
    pub fn phase_shift(&self) -> f64 {
        self.phase_shift
    }

    /// Payload carried from the emission.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The wavefront this one was reflected from, if any. Identity
    /// lookup only; the parent may already be retired.
    pub fn origin(&self) -> Option<WavefrontId> {
        self.origin
    }

    /// Whether this wavefront was below the detectability threshold on
    /// the previous tick and will retire on the next sweep.
    pub fn retire_pending(&self) -> bool {
        self.retire_pending
    }

    /// Advance the wavefront to `now`.
    ///
    /// Shifts the shell (`last_radius <- radius`), recomputes the radius
    /// from the emission time, and once the radius is positive derives
    /// the intensity from the inverse-square law scaled by the
    /// remaining intensity factor.
    pub fn age_to(&mut self, now: f64) {
        self.last_radius = self.radius;
        self.radius = (self.speed * (now - self.emitted_at)).max(0.0);
        if self.radius > 0.0 {
            self.intensity = Some(self.base_intensity() * self.intensity_factor);
        }
    }

    /// Inverse-square intensity at the current radius, before the
    /// intensity factor is applied. Caller guards `radius > 0`.
    fn base_intensity(&self) -> f64 {
        self.total_power / (4.0 * PI * self.radius * self.radius)
    }

    /// Test a boundary face for a first-time crossing.
    ///
    /// A hit requires the face to lie within the current radius on its
    /// own side of the center and strictly inside the open interval of
    /// this wavefront's reflection limits — the same physical edge can
    /// never reflect the same wavefront twice. A face through the
    /// center is degenerate and yields no reflection.
    ///
    /// On a hit the limits are narrowed toward the face, this
    /// wavefront keeps 0.75 of its previous intensity factor, and the
    /// returned mirror starts with 0.5 of it plus a π phase shift.
    pub fn crosses_boundary(&mut self, face: Face) -> Option<Wavefront> {
        let center = self.center.axis(face.axis);
        let depth = face.offset - center;

        // Degenerate: the face passes through the center.
        if depth == 0.0 {
            return None;
        }
        if depth.abs() > self.radius {
            return None;
        }

        let (lo, hi) = self.reflection_limits[face.axis.index()];
        if face.offset <= lo || face.offset >= hi {
            return None;
        }

        // The half-line beyond this face is used up.
        if face.offset < center {
            self.reflection_limits[face.axis.index()].0 = face.offset;
        } else {
            self.reflection_limits[face.axis.index()].1 = face.offset;
        }

        let child_factor = 0.5 * self.intensity_factor;
        self.intensity_factor *= 0.75;

        let mut mirror_center = self.center;
        *mirror_center.axis_mut(face.axis) += 2.0 * depth;

        let crossing = Crossing {
            mirror_center,
            child_id: WavefrontId::next(),
            child_factor,
            child_phase: self.phase_shift + PI,
            child_limits: self.reflection_limits,
        };
        let mirror = self.mirror_of(&crossing);
        self.crossings.push(crossing);
        Some(mirror)
    }

    /// Re-derive the transient mirrors for every recorded crossing from
    /// this wavefront's current shell.
    pub(crate) fn recorded_mirrors(&self) -> impl Iterator<Item = Wavefront> + '_ {
        self.crossings.iter().map(|c| self.mirror_of(c))
    }

    /// Ids of the mirrors this wavefront derives, for memo cleanup when
    /// it retires.
    pub(crate) fn mirror_ids(&self) -> impl Iterator<Item = WavefrontId> + '_ {
        self.crossings.iter().map(|c| c.child_id)
    }

    /// Build the mirror wavefront for one crossing record, inheriting
    /// this wavefront's current shell.
    fn mirror_of(&self, crossing: &Crossing) -> Wavefront {
        let intensity = (self.radius > 0.0).then(|| self.base_intensity() * crossing.child_factor);
        Wavefront {
            id: crossing.child_id,
            source: self.source,
            center: crossing.mirror_center,
            radius: self.radius,
            last_radius: self.last_radius,
            intensity,
            intensity_factor: crossing.child_factor,
            frequency: self.frequency,
            total_power: self.total_power,
            speed: self.speed,
            emitted_at: self.emitted_at,
            phase_shift: crossing.child_phase,
            payload: self.payload.clone(),
            origin: Some(self.id),
            retire_pending: false,
            reflection_limits: crossing.child_limits,
            crossings: SmallVec::new(),
        }
    }

    /// Edge-triggered arrival test.
    ///
    /// True iff the receiver lies inside the current radius but lay
    /// outside the shell on the previous tick: a receiver is hit exactly
    /// once, on the tick the growing sphere first encloses it.
    pub fn intersects(&self, dist_sq: f64, previous_dist_sq: f64) -> bool {
        self.radius * self.radius >= dist_sq
            && self.last_radius * self.last_radius < previous_dist_sq
    }

    /// Extrapolate this wavefront to an intermediate time.
    ///
    /// Used so that detection events carry the intensity at the exact
    /// moment of arrival rather than at tick granularity. The snapshot
    /// keeps this wavefront's identity, phase, payload, and origin; its
    /// shell is collapsed to the instantaneous radius.
    pub fn snapshot_at(&self, time: f64) -> Wavefront {
        let radius = (self.speed * (time - self.emitted_at)).max(0.0);
        let mut snapshot = self.clone();
        snapshot.radius = radius;
        snapshot.last_radius = radius;
        snapshot.crossings = SmallVec::new();
        snapshot.intensity =
            (radius > 0.0).then(|| snapshot.base_intensity() * snapshot.intensity_factor);
        snapshot
    }

    /// Time at which this wavefront's surface sits at its current
    /// radius.
    pub fn surface_time(&self) -> f64 {
        self.emitted_at + self.radius / self.speed
    }

    /// The reading a receiver observes from this wavefront, unmodified.
    pub fn reading(&self) -> FieldReading {
        FieldReading {
            intensity: self.intensity.unwrap_or(0.0),
            frequency: self.frequency,
            phase: wrap_phase(2.0 * PI * self.radius * self.frequency + self.phase_shift),
            arrival_time: self.surface_time(),
            source: self.source,
            payload: self.payload.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::Axis;

    fn sphere_at(center: Vec3) -> Wavefront {
        Wavefront::spawn(ObjectId(0), center, 1.0, Emission::new(1.0, 1.0, 0.0))
    }

    // ---------------------------------------------------------------
    // Aging
    // ---------------------------------------------------------------

    #[test]
    fn aging_grows_the_shell() {
        let mut w = sphere_at(Vec3::ZERO);
        assert_eq!(w.radius(), 0.0);
        assert!(w.intensity().is_none());

        w.age_to(2.0);
        assert_eq!(w.radius(), 2.0);
        assert_eq!(w.last_radius(), 0.0);

        w.age_to(3.0);
        assert_eq!(w.radius(), 3.0);
        assert_eq!(w.last_radius(), 2.0);
        assert!(w.last_radius() <= w.radius());
    }

    #[test]
    fn intensity_follows_inverse_square() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(5.0);
        let expected = 1.0 / (4.0 * PI * 25.0);
        assert!((w.intensity().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn intensity_undefined_before_departure() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(0.0);
        assert_eq!(w.radius(), 0.0);
        assert!(w.intensity().is_none());
        // A clock earlier than the emission clamps instead of shrinking.
        w.age_to(-1.0);
        assert_eq!(w.radius(), 0.0);
    }

    // ---------------------------------------------------------------
    // Arrival detection
    // ---------------------------------------------------------------

    #[test]
    fn arrival_is_edge_triggered() {
        let mut w = sphere_at(Vec3::ZERO);
        let d_sq = 9.0; // receiver at distance 3

        let mut hits = 0;
        for tick in 1..10 {
            w.age_to(f64::from(tick));
            if w.intersects(d_sq, d_sq) {
                hits += 1;
                assert_eq!(tick, 3);
            }
        }
        assert_eq!(hits, 1);
    }

    // ---------------------------------------------------------------
    // Boundary crossing
    // ---------------------------------------------------------------

    #[test]
    fn crossing_mirrors_across_the_face() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(2.5);

        let mirror = w
            .crosses_boundary(Face::new(Axis::X, 2.0))
            .expect("shell straddles the face");
        assert_eq!(mirror.center(), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(mirror.radius(), w.radius());
        assert_eq!(mirror.origin(), Some(w.id()));
    }

    #[test]
    fn crossing_splits_energy() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(2.5);
        let before = w.intensity_factor();

        let mirror = w.crosses_boundary(Face::new(Axis::X, 2.0)).unwrap();
        assert_eq!(w.intensity_factor(), 0.75 * before);
        assert_eq!(mirror.intensity_factor(), 0.5 * before);
        assert_eq!(mirror.phase_shift(), w.phase_shift() + PI);
    }

    #[test]
    fn same_face_never_reflects_twice() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(2.5);
        assert!(w.crosses_boundary(Face::new(Axis::X, 2.0)).is_some());
        assert!(w.crosses_boundary(Face::new(Axis::X, 2.0)).is_none());
        // Everything beyond the used face is off-limits too.
        w.age_to(10.0);
        assert!(w.crosses_boundary(Face::new(Axis::X, 3.0)).is_none());
        // The opposite side stays open.
        assert!(w.crosses_boundary(Face::new(Axis::X, -4.0)).is_some());
    }

    #[test]
    fn child_cannot_reuse_the_creating_face() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(2.5);
        let mut mirror = w.crosses_boundary(Face::new(Axis::X, 2.0)).unwrap();
        // The mirror (centered at x=4) inherits the narrowed limits, so
        // the face at x=2 cannot reflect it back.
        mirror.age_to(3.0);
        assert!(mirror.crosses_boundary(Face::new(Axis::X, 2.0)).is_none());
    }

    #[test]
    fn face_beyond_the_shell_is_ignored() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(1.0);
        assert!(w.crosses_boundary(Face::new(Axis::X, 2.0)).is_none());
    }

    #[test]
    fn face_through_center_is_degenerate() {
        let mut w = sphere_at(Vec3::new(2.0, 0.0, 0.0));
        w.age_to(1.0);
        assert!(w.crosses_boundary(Face::new(Axis::X, 2.0)).is_none());
    }

    #[test]
    fn recorded_mirrors_follow_the_parent_shell() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(2.5);
        let first = w.crosses_boundary(Face::new(Axis::X, 2.0)).unwrap();

        w.age_to(4.0);
        let rederived: Vec<Wavefront> = w.recorded_mirrors().collect();
        assert_eq!(rederived.len(), 1);
        assert_eq!(rederived[0].id(), first.id());
        assert_eq!(rederived[0].radius(), 4.0);
        assert_eq!(rederived[0].last_radius(), 2.5);
        assert_eq!(rederived[0].center(), Vec3::new(4.0, 0.0, 0.0));
    }

    // ---------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------

    #[test]
    fn snapshot_carries_arrival_intensity() {
        let mut w = sphere_at(Vec3::ZERO);
        w.age_to(6.0);

        let snap = w.snapshot_at(5.0);
        assert_eq!(snap.radius(), 5.0);
        let expected = 1.0 / (4.0 * PI * 25.0);
        assert!((snap.intensity().unwrap() - expected).abs() < 1e-12);
        assert_eq!(snap.id(), w.id());
        assert!((snap.surface_time() - 5.0).abs() < 1e-12);
    }

    // ---------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn radius_monotone_under_sorted_clocks(
                mut times in prop::collection::vec(0.0f64..100.0, 1..20),
                speed in 0.1f64..10.0,
            ) {
                times.sort_by(|a, b| a.partial_cmp(b).unwrap());
                let mut w = Wavefront::spawn(
                    ObjectId(0),
                    Vec3::ZERO,
                    speed,
                    Emission::new(1.0, 1.0, 0.0),
                );
                let mut previous = 0.0;
                for now in times {
                    w.age_to(now);
                    prop_assert!(w.radius() >= previous);
                    prop_assert!(w.last_radius() <= w.radius());
                    previous = w.radius();
                }
            }

            #[test]
            fn arrival_fires_exactly_once(distance in 0.5f64..20.0, dt in 0.05f64..1.0) {
                let mut w = Wavefront::spawn(
                    ObjectId(0),
                    Vec3::ZERO,
                    1.0,
                    Emission::new(1.0, 1.0, 0.0),
                );
                let dist_sq = distance * distance;
                let mut hits = 0;
                let mut now = 0.0;
                while now < 25.0 {
                    now += dt;
                    w.age_to(now);
                    if w.intersects(dist_sq, dist_sq) {
                        hits += 1;
                    }
                }
                prop_assert_eq!(hits, 1, "stationary receiver at {}", distance);
            }

            #[test]
            fn energy_split_is_multiplicative(first in 1.5f64..5.0, second in 6.0f64..9.0) {
                let mut w = Wavefront::spawn(
                    ObjectId(0),
                    Vec3::ZERO,
                    1.0,
                    Emission::new(1.0, 1.0, 0.0),
                );
                w.age_to(10.0);

                let a = w.crosses_boundary(Face::new(Axis::X, first)).unwrap();
                prop_assert!((w.intensity_factor() - 0.75).abs() < 1e-12);
                prop_assert!((a.intensity_factor() - 0.5).abs() < 1e-12);

                // A second crossing on the other side splits the remainder.
                let b = w.crosses_boundary(Face::new(Axis::X, -second)).unwrap();
                prop_assert!((w.intensity_factor() - 0.75 * 0.75).abs() < 1e-12);
                prop_assert!((b.intensity_factor() - 0.5 * 0.75).abs() < 1e-12);
            }
        }
    }
}
