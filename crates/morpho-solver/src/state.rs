//! Particle state: the per-particle buffers the integrator advances.
//!
//! Positions live in the carrier's local frame. Every particle has unit
//! mass, so forces and accelerations are the same quantity.

use morpho_math::Vec3;

/// Mutable per-particle buffers.
///
/// All arrays have length `particle_count`.
#[derive(Debug, Clone, Default)]
pub struct ParticleState {
    /// Current positions.
    pub positions: Vec<Vec3>,
    /// Current velocities.
    pub velocities: Vec<Vec3>,
    /// Acceleration applied in the most recent sub-step.
    pub accelerations: Vec<Vec3>,
}

impl ParticleState {
    /// Initializes a body at rest at the given positions.
    pub fn at_rest(positions: Vec<Vec3>) -> Self {
        let n = positions.len();
        Self {
            positions,
            velocities: vec![Vec3::ZERO; n],
            accelerations: vec![Vec3::ZERO; n],
        }
    }

    /// Number of particles.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Total kinetic energy: 0.5 * Σ ||v_i||² (unit mass).
    pub fn kinetic_energy(&self) -> f64 {
        self.velocities
            .iter()
            .map(|v| 0.5 * f64::from(v.length_squared()))
            .sum()
    }

    /// Mean particle position.
    pub fn centroid(&self) -> Vec3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        self.positions.iter().copied().sum::<Vec3>() / self.positions.len() as f32
    }

    /// Largest particle speed.
    pub fn max_speed(&self) -> f32 {
        self.velocities
            .iter()
            .map(|v| v.length())
            .fold(0.0, f32::max)
    }

    /// Number of particles whose position or velocity is NaN or infinite.
    pub fn non_finite_count(&self) -> usize {
        self.positions
            .iter()
            .zip(&self.velocities)
            .filter(|(p, v)| !p.is_finite() || !v.is_finite())
            .count()
    }
}
