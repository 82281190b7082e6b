//! Minimal 3-D vector math and axis addressing.
//!
//! The engine only needs a handful of operations (difference, dot
//! product, squared norm, per-axis access), so the type is hand-rolled
//! rather than pulled from a linear-algebra crate.

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A point or displacement in 3-D space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// The origin / zero displacement.
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Construct a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The component along `axis`.
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Mutable access to the component along `axis`.
    pub fn axis_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Dot product.
    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared Euclidean length.
    pub fn norm_sq(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// Squared distance to another point.
    pub fn distance_sq(self, other: Vec3) -> f64 {
        (self - other).norm_sq()
    }

    /// Scale all components by `k`.
    pub fn scale(self, k: f64) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }

    /// Unit vector in the same direction, or `None` when the length is
    /// zero or not finite.
    pub fn normalized(self) -> Option<Vec3> {
        let n = self.norm();
        if n > 0.0 && n.is_finite() {
            Some(self.scale(1.0 / n))
        } else {
            None
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    fn from(v: (f64, f64, f64)) -> Self {
        Vec3::new(v.0, v.1, v.2)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three coordinate axes.
///
/// Obstacle boundaries are axis-aligned half-space planes, so reflection
/// geometry is addressed per axis throughout the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// All three axes, in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index of this axis into a `[T; 3]` per-axis table.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Wrap a phase angle into `[-π, π)`.
pub fn wrap_phase(a: f64) -> f64 {
    use std::f64::consts::PI;
    // rem_euclid can round a tiny negative remainder up to the modulus
    // itself; fold that edge back to -π.
    let wrapped = (a + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped < PI {
        wrapped
    } else {
        -PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn axis_access_round_trips() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        for axis in Axis::ALL {
            assert_eq!(v.axis(axis), *v.axis_mut(axis));
        }
        *v.axis_mut(Axis::Y) = 5.0;
        assert_eq!(v.y, 5.0);
    }

    #[test]
    fn norms_and_distances() {
        let a = Vec3::new(1.0, 2.0, 2.0);
        assert_eq!(a.norm_sq(), 9.0);
        assert_eq!(a.norm(), 3.0);
        assert_eq!(a.distance_sq(Vec3::ZERO), 9.0);
        assert_eq!((a - a).norm(), 0.0);
    }

    #[test]
    fn normalized_guards_zero_length() {
        assert!(Vec3::ZERO.normalized().is_none());
        let unit = Vec3::new(0.0, 3.0, 0.0).normalized().unwrap();
        assert!((unit.norm() - 1.0).abs() < 1e-12);
        assert_eq!(unit.y, 1.0);
    }

    #[test]
    fn wrap_phase_stays_in_range() {
        for k in -10i32..=10 {
            let a = wrap_phase(0.3 + f64::from(k) * 2.0 * PI);
            assert!((-PI..PI).contains(&a));
            assert!((a - 0.3).abs() < 1e-9);
        }
        assert_eq!(wrap_phase(PI), -PI);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_vec3() -> impl Strategy<Value = Vec3> {
            (-1e3f64..1e3, -1e3f64..1e3, -1e3f64..1e3)
                .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        }

        proptest! {
            #[test]
            fn dot_commutative(a in arb_vec3(), b in arb_vec3()) {
                prop_assert_eq!(a.dot(b), b.dot(a));
            }

            #[test]
            fn distance_symmetric(a in arb_vec3(), b in arb_vec3()) {
                prop_assert_eq!(a.distance_sq(b), b.distance_sq(a));
            }

            #[test]
            fn norm_sq_non_negative(a in arb_vec3()) {
                prop_assert!(a.norm_sq() >= 0.0);
            }

            #[test]
            fn wrap_phase_in_range(a in -1e6f64..1e6) {
                let w = wrap_phase(a);
                prop_assert!((-PI..PI).contains(&w), "wrapped {a} to {w}");
            }
        }
    }
}
