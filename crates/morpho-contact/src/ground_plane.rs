//! Ground plane collision.
//!
//! A half-space `p · normal >= height` in the body's particle frame. Any
//! particle at or below the plane gets the plane normal as a constrained
//! direction, so the integrator drops whatever acceleration pushes it
//! along the normal. The colliding acceleration then:
//! - cancels normal velocity heading into the plane over one step,
//! - pushes a `correction` fraction of the penetration back out,
//! - bleeds a `friction` fraction of tangential velocity per step.

use serde::{Deserialize, Serialize};

use morpho_math::Vec3;
use morpho_solver::{CollisionResolver, ContactField, ParticleState};

/// Ground plane resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundPlaneResolver {
    /// Plane offset along the normal.
    pub height: f32,
    /// Unit plane normal pointing out of the ground.
    pub normal: Vec3,
    /// Fraction of tangential velocity removed per step, in `[0, 1]`.
    pub friction: f32,
    /// Fraction of penetration depth pushed out per step, in `[0, 1]`.
    /// Values near 1 make resting contacts jitter.
    #[serde(default = "default_correction")]
    pub correction: f32,
}

fn default_correction() -> f32 {
    0.2
}

impl Default for GroundPlaneResolver {
    fn default() -> Self {
        Self::horizontal(0.0)
    }
}

impl GroundPlaneResolver {
    /// Horizontal plane at `y = height` with moderate friction.
    pub fn horizontal(height: f32) -> Self {
        Self {
            height,
            normal: Vec3::Y,
            friction: 0.5,
            correction: default_correction(),
        }
    }

    /// Plane with an arbitrary normal; the normal is normalized, falling
    /// back to +Y when it has no length.
    pub fn new(height: f32, normal: Vec3, friction: f32) -> Self {
        Self {
            height,
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
            friction: friction.clamp(0.0, 1.0),
            correction: default_correction(),
        }
    }

    /// Signed distance of `p` above the plane.
    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        p.dot(self.normal) - self.height
    }
}

impl CollisionResolver for GroundPlaneResolver {
    fn resolve(&mut self, dt: f32, state: &ParticleState, field: &mut ContactField) -> usize {
        if dt <= 0.0 {
            return 0;
        }
        let inv_dt = 1.0 / dt;
        let n = self.normal;
        let mut active = 0;

        for (i, (&p, &v)) in state.positions.iter().zip(&state.velocities).enumerate() {
            let depth = -self.distance(p);
            if depth < 0.0 {
                continue;
            }

            let vn = v.dot(n);
            let tangential = v - n * vn;
            let approach = (-vn).max(0.0);
            let normal_dv = approach + self.correction * depth * inv_dt;

            let frame = field.frame_mut(i);
            frame.directions[0] = n;
            frame.colliding_accel = (n * normal_dv - tangential * self.friction) * inv_dt;
            active += 1;
        }

        active
    }

    fn name(&self) -> &str {
        "ground_plane"
    }
}
