//! State snapshot serialization for replay and debugging.
//!
//! Snapshots capture particle positions and velocities at a point in
//! time. They are serialized with `bincode` and can be written back into
//! a body built from the same mesh.

use serde::{Deserialize, Serialize};

use morpho_math::Vec3;
use morpho_solver::SoftBody;
use morpho_types::{MorphoError, MorphoResult};

/// Particle state of one body at one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Completed steps when the snapshot was taken.
    pub step: u64,
    /// Simulation time in seconds.
    pub sim_time: f64,
    /// Particle positions (carrier-local).
    pub positions: Vec<Vec3>,
    /// Particle velocities.
    pub velocities: Vec<Vec3>,
}

impl StateSnapshot {
    /// Captures the current state of `body`.
    pub fn capture(body: &SoftBody, sim_time: f64) -> Self {
        Self {
            step: body.step_count(),
            sim_time,
            positions: body.positions().to_vec(),
            velocities: body.velocities().to_vec(),
        }
    }

    /// Number of particles.
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Writes the snapshot's positions and velocities back into `body`.
    pub fn restore_into(&self, body: &mut SoftBody) -> MorphoResult<()> {
        if self.particle_count() != body.particle_count()
            || self.velocities.len() != self.positions.len()
        {
            return Err(MorphoError::InvalidConfig(format!(
                "Snapshot holds {} particles, body has {}",
                self.particle_count(),
                body.particle_count()
            )));
        }
        body.positions_mut().copy_from_slice(&self.positions);
        body.velocities_mut().copy_from_slice(&self.velocities);
        Ok(())
    }

    /// Largest position difference to `other`, `None` if the particle
    /// counts differ.
    pub fn max_position_delta(&self, other: &Self) -> Option<f32> {
        if self.particle_count() != other.particle_count() {
            return None;
        }
        Some(
            self.positions
                .iter()
                .zip(&other.positions)
                .map(|(a, b)| a.distance(*b))
                .fold(0.0, f32::max),
        )
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> MorphoResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| MorphoError::Serialization(format!("Snapshot encoding failed: {e}")))
    }

    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> MorphoResult<Self> {
        bincode::deserialize(data)
            .map_err(|e| MorphoError::Serialization(format!("Snapshot decoding failed: {e}")))
    }
}
