//! 3D points, world bounds and 2D render polygons.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A position in battle space.
pub type Point3D = glam::DVec3;

/// Formats a point as `[x, y, z]` with two decimals per axis.
#[must_use]
pub fn format_point(p: Point3D) -> String {
    format!("[{:.2}, {:.2}, {:.2}]", p.x, p.y, p.z)
}

// =============================================================================
// World Bounds
// =============================================================================

/// Extents of the battle volume. Every axis spans `[0, extent)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Extent along x.
    pub x: f64,
    /// Extent along y.
    pub y: f64,
    /// Extent along z.
    pub z: f64,
}

impl WorldBounds {
    /// Creates bounds with the given extents.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Checks that all three extents are positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.x) && ok(self.y) && ok(self.z) {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds {
                x: self.x,
                y: self.y,
                z: self.z,
            })
        }
    }

    /// Draws a point uniformly from the volume.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point3D {
        Point3D::new(
            rng.gen::<f64>() * self.x,
            rng.gen::<f64>() * self.y,
            rng.gen::<f64>() * self.z,
        )
    }

    /// Returns true if `p` lies inside the half-open volume.
    #[must_use]
    pub fn contains(&self, p: Point3D) -> bool {
        (0.0..self.x).contains(&p.x) && (0.0..self.y).contains(&p.y) && (0.0..self.z).contains(&p.z)
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(600.0, 600.0, 600.0)
    }
}

// =============================================================================
// Polygon
// =============================================================================

/// A closed 2D outline used by the renderer.
///
/// All transforms return new polygons; the source outline is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    /// Creates a polygon from vertices.
    #[must_use]
    pub fn new(vertices: Vec<DVec2>) -> Self {
        Self { vertices }
    }

    /// Creates a polygon from `(x, y)` pairs.
    #[must_use]
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| DVec2::new(x, y)).collect())
    }

    /// Returns the vertices in order.
    #[must_use]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Scales every vertex about the origin.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.vertices.iter().map(|v| *v * factor).collect())
    }

    /// Shifts every vertex.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let offset = DVec2::new(dx, dy);
        Self::new(self.vertices.iter().map(|v| *v + offset).collect())
    }

    /// Rotates every vertex about the origin by `angle` radians.
    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        let rotation = DVec2::from_angle(angle);
        Self::new(self.vertices.iter().map(|v| rotation.rotate(*v)).collect())
    }
}
