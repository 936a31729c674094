//! Collision seam: per-particle contact frames and the resolver trait.
//!
//! Once per world step a [`CollisionResolver`] fills a [`ContactField`].
//! During every sub-step the integrator projects each particle's
//! acceleration out of that particle's constrained directions and adds the
//! resolver's colliding acceleration:
//!
//! ```text
//! a' = a - Σ_k d_k (a · d_k) + colliding_accel
//! ```
//!
//! A neutral frame (all zero) leaves the acceleration untouched.

use morpho_math::Vec3;

use crate::state::ParticleState;

/// Constraint directions and collision response of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactFrame {
    /// Up to three constrained directions. Zero vectors are inactive.
    pub directions: [Vec3; 3],
    /// Acceleration added after projection.
    pub colliding_accel: Vec3,
}

impl ContactFrame {
    /// Frame that leaves accelerations unchanged.
    pub const NEUTRAL: Self = Self {
        directions: [Vec3::ZERO; 3],
        colliding_accel: Vec3::ZERO,
    };

    /// Returns true when the frame changes nothing.
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Removes the components of `a` along each direction and adds the
    /// colliding acceleration.
    #[inline]
    pub fn project(&self, a: Vec3) -> Vec3 {
        let mut out = a;
        for d in self.directions {
            out -= d * a.dot(d);
        }
        out + self.colliding_accel
    }
}

impl Default for ContactFrame {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// One contact frame per particle.
#[derive(Debug, Clone, Default)]
pub struct ContactField {
    frames: Vec<ContactFrame>,
}

impl ContactField {
    /// Neutral field for `particle_count` particles.
    pub fn new(particle_count: usize) -> Self {
        Self {
            frames: vec![ContactFrame::NEUTRAL; particle_count],
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the field has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resets every frame to neutral.
    pub fn reset(&mut self) {
        self.frames.fill(ContactFrame::NEUTRAL);
    }

    /// Frame of particle `i`.
    #[inline]
    pub fn frame(&self, i: usize) -> &ContactFrame {
        &self.frames[i]
    }

    /// Mutable frame of particle `i`.
    #[inline]
    pub fn frame_mut(&mut self, i: usize) -> &mut ContactFrame {
        &mut self.frames[i]
    }

    /// All frames.
    pub fn frames(&self) -> &[ContactFrame] {
        &self.frames
    }

    /// Number of non-neutral frames.
    pub fn active_count(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_neutral()).count()
    }
}

/// Fills contact frames for a body once per world step.
///
/// `state` holds positions and velocities after the carrier's angular
/// impulse has been applied. The field arrives reset to neutral. Returns
/// the number of particles the resolver constrained.
pub trait CollisionResolver {
    /// Writes contact frames for a step of length `dt`.
    fn resolve(&mut self, dt: f32, state: &ParticleState, field: &mut ContactField) -> usize;

    /// Resolver name, for logging.
    fn name(&self) -> &str;
}

/// Resolver that never constrains anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContacts;

impl CollisionResolver for NoContacts {
    fn resolve(&mut self, _dt: f32, _state: &ParticleState, _field: &mut ContactField) -> usize {
        0
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_projection_is_identity() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(ContactFrame::NEUTRAL.project(a), a);
    }

    #[test]
    fn projection_removes_constrained_axis() {
        let frame = ContactFrame {
            directions: [Vec3::Y, Vec3::ZERO, Vec3::ZERO],
            colliding_accel: Vec3::new(0.0, 5.0, 0.0),
        };
        let out = frame.project(Vec3::new(1.0, -9.8, 2.0));
        assert_eq!(out, Vec3::new(1.0, 5.0, 2.0));
    }

    #[test]
    fn reset_clears_frames() {
        let mut field = ContactField::new(3);
        field.frame_mut(1).colliding_accel = Vec3::X;
        assert_eq!(field.active_count(), 1);
        field.reset();
        assert_eq!(field.active_count(), 0);
    }
}
