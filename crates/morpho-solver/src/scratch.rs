//! Per-step scratch buffers. The allocation is reused across steps; the
//! contents are cleared at the start of every step.

use morpho_math::Vec3;

/// Working arrays for one world step.
#[derive(Debug, Clone, Default)]
pub(crate) struct StepScratch {
    /// Velocities at the start of the step, after the angular impulse.
    pub v0: Vec<Vec3>,
    /// Volumetric gradient accumulator, per particle.
    pub volume_buffer: Vec<Vec3>,
    /// Per link: `dx * dv` component-wise.
    pub dpdv: Vec<Vec3>,
    /// Per link: `-dt * ks * compression`.
    pub a01: Vec<f32>,
    /// Per link: `-dt * ks * ratio / l²`.
    pub b01: Vec<f32>,
}

impl StepScratch {
    pub fn new(particle_count: usize, link_count: usize) -> Self {
        Self {
            v0: vec![Vec3::ZERO; particle_count],
            volume_buffer: vec![Vec3::ZERO; particle_count],
            dpdv: vec![Vec3::ZERO; link_count],
            a01: vec![0.0; link_count],
            b01: vec![0.0; link_count],
        }
    }

    /// Zeroes every buffer without reallocating.
    pub fn reset(&mut self) {
        self.v0.fill(Vec3::ZERO);
        self.volume_buffer.fill(Vec3::ZERO);
        self.dpdv.fill(Vec3::ZERO);
        self.a01.fill(0.0);
        self.b01.fill(0.0);
    }
}
