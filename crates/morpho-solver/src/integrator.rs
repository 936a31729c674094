//! Sub-stepped explicit integrator for spring links and volume cells.
//!
//! One world step:
//! 1. **Carrier**: drain force into a uniform acceleration and torque into
//!    an angular impulse `Δω × p` on every particle.
//! 2. **Contacts**: the resolver fills the contact field once.
//! 3. **Sub-steps**: accumulate link, damper and cell terms into each
//!    particle's acceleration, project it through the contact frame, then
//!    semi-implicit Euler with `h = dt / substeps`.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use morpho_math::tetra::volume_gradient;
use morpho_math::Vec3;

use crate::body::SoftBody;
use crate::carrier::CarrierBody;
use crate::contact::CollisionResolver;

/// Diagnostics from one world step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Index of the step, starting at zero.
    pub step: u64,
    /// Sub-steps actually run.
    pub substeps: u32,
    /// Particles the resolver constrained.
    pub active_contacts: usize,
    /// Link evaluations, summed over sub-steps, that hit the length floor.
    pub clamped_links: usize,
    /// Largest `|v - v_start|` over particles.
    pub max_velocity_change: f32,
    /// Particles with a NaN or infinite position or velocity.
    pub non_finite_particles: usize,
    /// Wall-clock time for this step (seconds).
    pub wall_time: f64,
}

impl SoftBody {
    /// Advances the body by `dt`, draining the carrier's accumulated force
    /// and torque and consulting `resolver` once.
    ///
    /// Numeric trouble is reported through the returned [`StepReport`] and
    /// `tracing` warnings; the step itself never fails.
    pub fn calculate_acceleration<R>(
        &mut self,
        dt: f32,
        carrier: &mut CarrierBody,
        resolver: &mut R,
    ) -> StepReport
    where
        R: CollisionResolver + ?Sized,
    {
        let start = Instant::now();
        let step = self.steps;

        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "skipping soft body step with invalid timestep");
            return StepReport {
                step,
                ..Default::default()
            };
        }

        self.scratch.reset();
        let (unit_accel, delta_omega) = carrier.drain(dt);

        for (v, p) in self
            .state
            .velocities
            .iter_mut()
            .zip(&self.state.positions)
        {
            *v += delta_omega.cross(*p);
        }
        self.scratch.v0.copy_from_slice(&self.state.velocities);

        self.contacts.reset();
        let active_contacts = resolver.resolve(dt, &self.state, &mut self.contacts);

        let substeps = self.config.substeps;
        let mut clamped_links = 0;
        if substeps > 0 {
            let h = dt / substeps as f32;
            for _ in 0..substeps {
                clamped_links += self.substep(dt, h, unit_accel);
            }
        }

        let max_velocity_change = self
            .state
            .velocities
            .iter()
            .zip(&self.scratch.v0)
            .map(|(v, v0)| (*v - *v0).length())
            .fold(0.0, f32::max);
        let non_finite_particles = self.state.non_finite_count();

        if clamped_links > 0 {
            warn!(step, clamped_links, "links compressed past the length floor");
        }
        if non_finite_particles > 0 {
            warn!(step, non_finite_particles, "soft body state is not finite");
        }

        self.steps += 1;
        let report = StepReport {
            step,
            substeps,
            active_contacts,
            clamped_links,
            max_velocity_change,
            non_finite_particles,
            wall_time: start.elapsed().as_secs_f64(),
        };
        trace!(
            step,
            resolver = resolver.name(),
            active_contacts,
            max_velocity_change,
            "soft body step"
        );
        report
    }

    /// One sub-step. Returns how many links hit the length floor.
    fn substep(&mut self, dt: f32, h: f32, unit_accel: Vec3) -> usize {
        let Self {
            topology,
            config,
            state,
            contacts,
            scratch,
            ..
        } = self;
        let ks = config.spring_stiffness;
        let kd = config.damper;
        let floor2 = topology.smallest_length2;

        let positions = &mut state.positions;
        let velocities = &mut state.velocities;
        let accelerations = &mut state.accelerations;

        accelerations.fill(unit_accel);
        scratch.volume_buffer.fill(Vec3::ZERO);

        // Cell volume gradients.
        for cell in &topology.cells {
            let idx = cell.indices.map(|p| p.index());
            let g = volume_gradient(idx.map(|i| positions[i]));
            let dv = g.volume - cell.rest_volume;
            for (&i, grad) in idx.iter().zip(g.gradient) {
                scratch.volume_buffer[i] += grad * dv;
            }
        }

        // Springs and dampers.
        let mut clamped = 0;
        for (k, link) in topology.links.iter().enumerate() {
            let (i0, i1) = (link.m0.index(), link.m1.index());
            let dx = positions[i0] - positions[i1];
            let dv = velocities[i0] - velocities[i1];

            let raw2 = dx.length_squared();
            let l2 = if raw2 < floor2 {
                clamped += 1;
                floor2
            } else {
                raw2
            };
            let den = 1.0 / l2.sqrt();
            let ratio = link.rest_length * den;
            let compression = 1.0 - ratio;

            let fs = dx * (ks * compression);
            let fd = dx * (kd * den * den * dv.dot(dx));
            accelerations[i0] -= fs + fd;
            accelerations[i1] += fs + fd;

            scratch.dpdv[k] = dx * dv;
            scratch.a01[k] = -dt * ks * compression;
            scratch.b01[k] = -dt * ks * ratio * den * den;
        }

        // Stiffness correction.
        for (k, link) in topology.links.iter().enumerate() {
            let (i0, i1) = (link.m0.index(), link.m1.index());
            let dx = positions[i0] - positions[i1];
            let dv = velocities[i0] - velocities[i1];
            let dfdx = dv * scratch.a01[k] + dx * scratch.dpdv[k] * scratch.b01[k];
            accelerations[i0] += dfdx;
            accelerations[i1] -= dfdx;
        }

        let kv = config.volumetric_stiffness;
        for i in 0..positions.len() {
            let a = accelerations[i] - scratch.volume_buffer[i] * kv;
            let a = contacts.frame(i).project(a);
            accelerations[i] = a;
            velocities[i] += a * h;
            positions[i] += velocities[i] * h;
        }

        clamped
    }
}
