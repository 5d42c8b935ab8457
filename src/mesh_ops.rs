//! Facet geometry using nalgebra
//!
//! This module provides the vector operations the geometry checks need:
//! - Face normal computation from vertex order (right-hand rule), with
//!   degeneracy detection for collinear or coincident vertices
//! - Agreement between a declared normal and the computed one
//!
//! Vectors are divided by their largest absolute component before any length
//! is taken, so squaring never overflows or underflows for finite input.

use crate::model::{Normal, Vertex};
use nalgebra::Vector3;

/// Convert a vertex to a position vector
#[inline]
pub fn to_vector(v: &Vertex) -> Vector3<f64> {
    Vector3::new(v.x, v.y, v.z)
}

/// Convert a declared normal to a vector
#[inline]
pub fn normal_to_vector(n: &Normal) -> Vector3<f64> {
    Vector3::new(n.x, n.y, n.z)
}

/// The two edges `v1 - v0` and `v2 - v0` of a triangle
pub fn edges(vertices: &[Vertex; 3]) -> (Vector3<f64>, Vector3<f64>) {
    let origin = to_vector(&vertices[0]);
    (
        to_vector(&vertices[1]) - origin,
        to_vector(&vertices[2]) - origin,
    )
}

/// Compute the unit face normal, or `None` if the facet is degenerate
///
/// A facet is degenerate when `|e1 x e2| <= collinear_epsilon * |e1| * |e2|`.
/// The left side is `|e1| |e2| sin(theta)`, so the test compares the sine of
/// the angle between the edges against the epsilon and does not depend on the
/// size of the facet. Coincident vertices give a zero-length edge and are
/// always degenerate.
///
/// # Example
/// ```
/// use stl_validator::{Vertex, mesh_ops::computed_normal};
///
/// let v0 = Vertex::new(0.0, 0.0, 0.0);
/// let v1 = Vertex::new(1.0, 0.0, 0.0);
/// let v2 = Vertex::new(0.0, 1.0, 0.0);
///
/// let normal = computed_normal(&[v0, v1, v2], 1e-6).unwrap();
/// assert_eq!((normal.x, normal.y, normal.z), (0.0, 0.0, 1.0));
///
/// // Reversing the vertex order flips the normal
/// let flipped = computed_normal(&[v0, v2, v1], 1e-6).unwrap();
/// assert_eq!(flipped.z, -1.0);
/// ```
pub fn computed_normal(vertices: &[Vertex; 3], collinear_epsilon: f64) -> Option<Vector3<f64>> {
    let (edge1, edge2) = edges(vertices);
    let extent = edge1.amax().max(edge2.amax());
    // An infinite extent means the edge itself overflowed
    if extent == 0.0 || !extent.is_finite() {
        return None;
    }

    let (edge1, edge2) = (edge1 / extent, edge2 / extent);
    let scale = edge1.norm() * edge2.norm();
    let cross = edge1.cross(&edge2);
    let magnitude = cross.norm();

    if scale == 0.0 || magnitude <= collinear_epsilon * scale {
        return None;
    }
    Some(cross / magnitude)
}

/// Cosine of the angle between a declared normal and a unit computed normal
///
/// Only the direction of the declared normal matters. A zero declared normal
/// has no direction and yields 0.0.
pub fn winding_cosine(declared: &Normal, computed: &Vector3<f64>) -> f64 {
    let declared = normal_to_vector(declared);
    let extent = declared.amax();
    if extent == 0.0 || !extent.is_finite() {
        return 0.0;
    }

    let direction = declared / extent;
    direction.dot(computed) / direction.norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [Vertex; 3] {
        [
            Vertex::new(a[0], a[1], a[2]),
            Vertex::new(b[0], b[1], b[2]),
            Vertex::new(c[0], c[1], c[2]),
        ]
    }

    /// Right triangle in the XY plane with legs of length `s`
    fn right_triangle(s: f64) -> [Vertex; 3] {
        tri([0.0, 0.0, 0.0], [s, 0.0, 0.0], [0.0, s, 0.0])
    }

    #[test]
    fn test_computed_normal_orientation() {
        // Counter-clockwise in the XY plane
        let normal = computed_normal(&right_triangle(1.0), EPS).unwrap();
        assert!((normal.z - 1.0).abs() < 1e-10, "Z: {}", normal.z);

        // Clockwise order flips the normal
        let mut clockwise = right_triangle(1.0);
        clockwise.swap(1, 2);
        let normal = computed_normal(&clockwise, EPS).unwrap();
        assert!((normal.z - (-1.0)).abs() < 1e-10);

        let slanted = tri([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        let normal = computed_normal(&slanted, EPS).unwrap();
        assert!((normal.norm() - 1.0).abs() < 1e-10);
        assert!((normal.x - normal.y).abs() < 1e-10);
        assert!((normal.y - normal.z).abs() < 1e-10);
    }

    #[test]
    fn test_computed_normal_degenerate_cases() {
        // Coincident vertices
        let coincident = tri([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [2.0, 0.0, 0.0]);
        assert!(computed_normal(&coincident, EPS).is_none());

        // Collinear vertices
        let collinear = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(computed_normal(&collinear, EPS).is_none());

        // Nearly collinear: sine of edge angle about 1e-9
        let sliver = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1e-9, 0.0]);
        assert!(computed_normal(&sliver, EPS).is_none());
    }

    #[test]
    fn test_computed_normal_is_scale_independent() {
        let tiny = computed_normal(&right_triangle(1e-5), EPS).unwrap();
        assert!((tiny.z - 1.0).abs() < 1e-12);

        let upright = tri([0.0, 0.0, 0.0], [1e6, 0.0, 0.0], [0.0, 0.0, 1e6]);
        let huge = computed_normal(&upright, EPS).unwrap();
        assert!((huge.y - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_computed_normal_at_extreme_scales() {
        // Squared edge lengths overflow or underflow at these sizes
        for s in [1e160, 1e-160, 1e300, 1e-300] {
            let normal = computed_normal(&right_triangle(s), EPS);
            assert!(normal.is_some(), "scale {} is not degenerate", s);
            let normal = normal.unwrap();
            assert!((normal.z - 1.0).abs() < 1e-12, "scale {}: {}", s, normal.z);
        }

        let sliver = tri([0.0, 0.0, 0.0], [1e160, 0.0, 0.0], [1e160, 1e150, 0.0]);
        assert!(computed_normal(&sliver, EPS).is_none());
    }

    #[test]
    fn test_winding_cosine() {
        let up = Vector3::new(0.0, 0.0, 1.0);
        let cosine = |z: f64| winding_cosine(&Normal::new(0.0, 0.0, z), &up);

        assert!((cosine(1.0) - 1.0).abs() < 1e-12);
        assert!((cosine(-1.0) + 1.0).abs() < 1e-12);
        // Magnitude of the declared normal does not matter
        assert!((cosine(5.0) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(0.0), 0.0);
        let sideways = winding_cosine(&Normal::new(1.0, 0.0, 0.0), &up);
        assert!(sideways.abs() < 1e-12);
    }

    #[test]
    fn test_winding_cosine_ignores_extreme_magnitudes() {
        let up = Vector3::new(0.0, 0.0, 1.0);
        for z in [1e200, 1e-200, f64::MAX, 5e-324] {
            let cosine = winding_cosine(&Normal::new(0.0, 0.0, z), &up);
            assert!((cosine - 1.0).abs() < 1e-12, "z {}: {}", z, cosine);
        }

        let tilted = winding_cosine(&Normal::new(1e200, 0.0, 1e200), &up);
        assert!((tilted - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }
}
