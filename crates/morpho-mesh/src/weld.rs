//! Vertex welding.
//!
//! Collapses vertices whose positions coincide within an absolute
//! per-component tolerance into one particle. Candidates are found with a
//! uniform spatial hash whose cell size equals the tolerance, so any
//! coincident pair sits in the same or an adjacent cell.
//!
//! Welding is purely geometric and ignores layer tags.

use std::collections::HashMap;

use morpho_math::Vec3;
use morpho_types::ParticleId;

/// Result of welding: raw vertex → particle mapping plus particle positions.
#[derive(Debug, Clone)]
pub struct WeldMap {
    /// For each raw vertex, its canonical particle.
    pub vertex_to_particle: Vec<ParticleId>,
    /// Particle positions, in first-occurrence order.
    pub particles: Vec<Vec3>,
}

impl WeldMap {
    /// Number of distinct particles.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Particle that raw vertex `v` was welded into.
    #[inline]
    pub fn particle_of(&self, v: u32) -> ParticleId {
        self.vertex_to_particle[v as usize]
    }

    /// Number of raw vertices that collapsed onto an earlier one.
    pub fn merged_count(&self) -> usize {
        self.vertex_to_particle.len() - self.particles.len()
    }
}

/// Returns true when every component of `a - b` is within `tolerance`.
#[inline]
pub fn coincident(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    (a - b).abs().max_element() <= tolerance
}

/// Welds `positions` within `tolerance`.
///
/// A vertex joins the lowest-numbered existing particle it coincides
/// with; otherwise it starts a new particle at its own position.
pub fn weld_vertices(positions: &[Vec3], tolerance: f32) -> WeldMap {
    let cell = f64::from(tolerance.max(f32::MIN_POSITIVE));
    let key = |p: Vec3| -> (i64, i64, i64) {
        (
            (f64::from(p.x) / cell).floor() as i64,
            (f64::from(p.y) / cell).floor() as i64,
            (f64::from(p.z) / cell).floor() as i64,
        )
    };

    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut particles: Vec<Vec3> = Vec::with_capacity(positions.len());
    let mut vertex_to_particle = Vec::with_capacity(positions.len());

    for &p in positions {
        let (cx, cy, cz) = key(p);
        let mut found: Option<u32> = None;

        for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                for dz in -1..=1_i64 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &candidate in bucket {
                        if coincident(particles[candidate as usize], p, tolerance)
                            && found.map_or(true, |f| candidate < f)
                        {
                            found = Some(candidate);
                        }
                    }
                }
            }
        }

        let particle = match found {
            Some(existing) => existing,
            None => {
                let id = particles.len() as u32;
                particles.push(p);
                grid.entry((cx, cy, cz)).or_default().push(id);
                id
            }
        };
        vertex_to_particle.push(ParticleId(particle));
    }

    WeldMap {
        vertex_to_particle,
        particles,
    }
}
