//! Tetrahedron volume helpers shared by the topology builder and the
//! integrator.
//!
//! Both phases measure a cell through the same three successive edge
//! vectors `p01 = p0 - p1`, `p12 = p1 - p2`, `p23 = p2 - p3`. The signed
//! volume is the scalar triple product `p01 · (p12 × p23)`, six times the
//! geometric volume. Rest volumes are stored in that same unit, so the
//! factor never needs to be divided out.

use glam::Vec3;

/// Scaled signed volume of the tetrahedron `[p0, p1, p2, p3]`.
///
/// Swapping any two points flips the sign.
#[inline]
pub fn signed_volume(p: [Vec3; 4]) -> f32 {
    let p01 = p[0] - p[1];
    let p12 = p[1] - p[2];
    let p23 = p[2] - p[3];
    p01.dot(p12.cross(p23))
}

/// Signed volume together with its gradient with respect to each point.
#[derive(Debug, Clone, Copy)]
pub struct VolumeGradient {
    /// Scaled signed volume (same unit as [`signed_volume`]).
    pub volume: f32,
    /// `∂V/∂p_i` for the four points. Sums to zero.
    pub gradient: [Vec3; 4],
}

/// Computes the volume and its gradient from the three cross-product
/// "area" terms of the edge chain.
pub fn volume_gradient(p: [Vec3; 4]) -> VolumeGradient {
    let p01 = p[0] - p[1];
    let p12 = p[1] - p[2];
    let p23 = p[2] - p[3];

    let area123 = p12.cross(p23);
    let area0123 = p23.cross(p01);
    let area012 = p12.cross(p01);

    VolumeGradient {
        volume: p01.dot(area123),
        gradient: [
            area123,
            area0123 - area123,
            -(area0123 + area012),
            area012,
        ],
    }
}
