//! The rigid carrier a soft body rides on.
//!
//! Particles are stored in the carrier's local frame. Each world step the
//! integrator drains the force and torque accumulated on the carrier:
//! force becomes a uniform acceleration of every particle, torque becomes
//! an angular velocity impulse applied as `Δω × p`. The carrier's own
//! angular motion and linear acceleration are then cleared.

use serde::{Deserialize, Serialize};

use morpho_math::{Affine3A, Mat3, Quat, Vec3};

/// Rigid-body state of the carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierBody {
    /// World position of the local frame origin.
    pub position: Vec3,
    /// World orientation of the local frame.
    pub rotation: Quat,
    /// Linear velocity. Kept across steps.
    pub velocity: Vec3,
    /// Angular velocity.
    pub omega: Vec3,
    /// Angular acceleration.
    pub alpha: Vec3,
    /// Linear acceleration.
    pub accel: Vec3,
    /// Inverse mass.
    pub inv_mass: f32,
    /// Inverse inertia tensor in world space.
    pub inv_world_inertia: Mat3,
    /// Force accumulated since the last step.
    pub external_force: Vec3,
    /// Torque accumulated since the last step.
    pub external_torque: Vec3,
}

impl Default for CarrierBody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            omega: Vec3::ZERO,
            alpha: Vec3::ZERO,
            accel: Vec3::ZERO,
            inv_mass: 1.0,
            inv_world_inertia: Mat3::IDENTITY,
            external_force: Vec3::ZERO,
            external_torque: Vec3::ZERO,
        }
    }
}

impl CarrierBody {
    /// Carrier at `position` with identity orientation and unit mass.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the inverse mass and inverse world inertia.
    pub fn with_inverse_mass(mut self, inv_mass: f32, inv_world_inertia: Mat3) -> Self {
        self.inv_mass = inv_mass;
        self.inv_world_inertia = inv_world_inertia;
        self
    }

    /// Accumulates a force.
    pub fn apply_force(&mut self, force: Vec3) {
        self.external_force += force;
    }

    /// Accumulates a torque.
    pub fn apply_torque(&mut self, torque: Vec3) {
        self.external_torque += torque;
    }

    /// Local-to-world transform.
    pub fn transform(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.rotation, self.position)
    }

    /// Drains accumulated force and torque.
    ///
    /// Returns the uniform particle acceleration and the angular velocity
    /// impulse for a step of length `dt`, and clears angular velocity,
    /// angular acceleration, linear acceleration, force and torque.
    pub(crate) fn drain(&mut self, dt: f32) -> (Vec3, Vec3) {
        let unit_accel = self.external_force * self.inv_mass;
        let delta_omega = self.inv_world_inertia * (self.external_torque * dt);

        self.omega = Vec3::ZERO;
        self.alpha = Vec3::ZERO;
        self.accel = Vec3::ZERO;
        self.external_force = Vec3::ZERO;
        self.external_torque = Vec3::ZERO;

        (unit_accel, delta_omega)
    }
}
