//! Obstacle reflection geometry.
//!
//! Obstacles are supplied externally and read per tick; the engine
//! never owns or mutates them. Only axis-aligned half-space boundaries
//! participate in reflection.

use crate::vec3::{Axis, Vec3};

/// A single axis-aligned half-space boundary of an obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    /// Axis the boundary plane is perpendicular to.
    pub axis: Axis,
    /// Offset of the plane along that axis.
    pub offset: f64,
}

impl Face {
    /// Construct a boundary face.
    pub const fn new(axis: Axis, offset: f64) -> Self {
        Self { axis, offset }
    }
}

/// Read-only reflection geometry for one obstacle.
#[derive(Clone, Debug, Default)]
pub struct Obstacle {
    /// The obstacle's boundary faces.
    pub faces: Vec<Face>,
}

impl Obstacle {
    /// An obstacle from an explicit face list.
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Convenience: the six faces of an axis-aligned box.
    pub fn aligned_box(min: Vec3, max: Vec3) -> Self {
        let faces = Axis::ALL
            .into_iter()
            .flat_map(|axis| {
                [
                    Face::new(axis, min.axis(axis)),
                    Face::new(axis, max.axis(axis)),
                ]
            })
            .collect();
        Self { faces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_box_has_six_faces() {
        let obs = Obstacle::aligned_box(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(obs.faces.len(), 6);
        assert!(obs
            .faces
            .contains(&Face::new(Axis::Y, -2.0)));
        assert!(obs.faces.contains(&Face::new(Axis::Z, 3.0)));
    }
}
