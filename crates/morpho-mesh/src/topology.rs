//! Soft-body topology extraction.
//!
//! Turns a layered directed-edge mesh into the particle/link/cell model
//! the integrator advances:
//!
//! 1. **Weld** coincident vertices into particles.
//! 2. **Links**: every mesh edge mapped through the weld table, ordered,
//!    sorted by packed key `(m0 << 32) | m1` and deduplicated.
//! 3. **Cells**: one flood fill per layer collects the 4 particles of a
//!    tetrahedral shell; orientation is fixed so every rest volume is
//!    non-negative.
//!
//! Rest lengths and rest volumes are captured here and never recomputed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use morpho_math::tetra::signed_volume;
use morpho_math::Vec3;
use morpho_types::constants::{
    DEGENERATE_LENGTH_THRESHOLD, DEGENERATE_VOLUME_THRESHOLD, MAX_FAN_STACK,
    SMALLEST_LENGTH_FRACTION, WELD_TOLERANCE,
};
use morpho_types::{HalfEdgeId, LayerId, MorphoError, MorphoResult, ParticleId};

use crate::half_edge::DirectedEdgeMesh;
use crate::weld::{weld_vertices, WeldMap};

/// Tolerances and limits for topology extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Absolute per-component weld tolerance (mesh-local units).
    pub weld_tolerance: f32,
    /// Maximum depth of the flood-fill stack for a single cell.
    pub max_fan_stack: usize,
    /// Rest lengths at or below this are `DegenerateGeometry`.
    pub min_rest_length: f32,
    /// Rest volumes (scaled triple product) at or below this are `DegenerateGeometry`.
    pub min_rest_volume: f32,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            weld_tolerance: WELD_TOLERANCE,
            max_fan_stack: MAX_FAN_STACK,
            min_rest_length: DEGENERATE_LENGTH_THRESHOLD,
            min_rest_volume: DEGENERATE_VOLUME_THRESHOLD,
        }
    }
}

impl TopologyConfig {
    /// Rejects values the builder cannot work with.
    pub fn validate(&self) -> MorphoResult<()> {
        if !(self.weld_tolerance.is_finite() && self.weld_tolerance > 0.0) {
            return Err(MorphoError::InvalidConfig(format!(
                "Weld tolerance must be positive, got {}",
                self.weld_tolerance
            )));
        }
        if self.max_fan_stack == 0 {
            return Err(MorphoError::InvalidConfig(
                "Fan stack depth must be >= 1".into(),
            ));
        }
        if self.min_rest_length < 0.0 || self.min_rest_volume < 0.0 {
            return Err(MorphoError::InvalidConfig(
                "Degeneracy thresholds must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// A structural spring between two particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Lower particle index.
    pub m0: ParticleId,
    /// Higher particle index.
    pub m1: ParticleId,
    /// Relaxed length.
    pub rest_length: f32,
}

impl Link {
    /// Packed sort key `(m0 << 32) | m1`.
    #[inline]
    pub fn key(&self) -> u64 {
        pack_key(self.m0.0, self.m1.0)
    }
}

/// Packs an ordered particle pair into the 64-bit link sort key.
#[inline]
pub fn pack_key(m0: u32, m1: u32) -> u64 {
    (u64::from(m0) << 32) | u64::from(m1)
}

/// A tetrahedral finite-element cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiniteElementCell {
    /// Four distinct particles, ordered so the signed volume is non-negative.
    pub indices: [ParticleId; 4],
    /// Relaxed volume, in the scaled triple-product unit of
    /// [`signed_volume`](morpho_math::tetra::signed_volume).
    pub rest_volume: f32,
    /// Layer the cell was extracted from.
    pub layer: LayerId,
}

/// The relaxed particle/link/cell model of a soft body.
#[derive(Debug, Clone)]
pub struct SoftTopology {
    /// Relaxed particle positions.
    pub particles: Vec<Vec3>,
    /// Raw mesh vertex → particle.
    pub vertex_to_particle: Vec<ParticleId>,
    /// Unique links sorted by packed key.
    pub links: Vec<Link>,
    /// One cell per layer, indexed by layer tag.
    pub cells: Vec<FiniteElementCell>,
    /// Squared-length floor guarding the link force against division blow-up.
    pub smallest_length2: f32,
    /// Raw vertices welded onto a particle first seen in another layer.
    pub cross_layer_welds: usize,
}

impl SoftTopology {
    /// Extracts the topology of `mesh`.
    ///
    /// Structural problems are `MalformedTopology`, zero-size links or
    /// cells are `DegenerateGeometry`. Nothing partial is returned.
    pub fn build<M: DirectedEdgeMesh + ?Sized>(
        mesh: &M,
        config: &TopologyConfig,
    ) -> MorphoResult<Self> {
        config.validate()?;

        let vertex_count = mesh.vertex_count();
        if vertex_count == 0 {
            return Err(MorphoError::InvalidMesh("Mesh has no vertices".into()));
        }

        let positions: Vec<Vec3> = (0..vertex_count as u32)
            .map(|v| mesh.vertex_position(v))
            .collect();
        let cell_count = (0..vertex_count as u32)
            .map(|v| mesh.vertex_layer(v).index())
            .max()
            .unwrap_or(0)
            + 1;

        let weld = weld_vertices(&positions, config.weld_tolerance);
        let cross_layer_welds = count_cross_layer_welds(mesh, &weld);
        if cross_layer_welds > 0 {
            warn!(
                cross_layer_welds,
                "weld merged vertices tagged with different layers"
            );
        }

        let links = extract_links(mesh, &weld, config)?;
        let cells = extract_cells(mesh, &weld, cell_count, config)?;

        let min_rest = links
            .iter()
            .map(|l| l.rest_length)
            .fold(f32::INFINITY, f32::min);
        let smallest_length2 = if min_rest.is_finite() {
            let floor = SMALLEST_LENGTH_FRACTION * min_rest;
            floor * floor
        } else {
            0.0
        };

        debug!(
            vertices = vertex_count,
            particles = weld.particle_count(),
            links = links.len(),
            cells = cells.len(),
            "soft topology built"
        );

        Ok(Self {
            particles: weld.particles,
            vertex_to_particle: weld.vertex_to_particle,
            links,
            cells,
            smallest_length2,
            cross_layer_welds,
        })
    }

    /// Number of particles.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Number of links.
    #[inline]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of finite-element cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

fn count_cross_layer_welds<M: DirectedEdgeMesh + ?Sized>(mesh: &M, weld: &WeldMap) -> usize {
    let mut first_layer: Vec<Option<LayerId>> = vec![None; weld.particle_count()];
    let mut crossings = 0;
    for (v, particle) in weld.vertex_to_particle.iter().enumerate() {
        let layer = mesh.vertex_layer(v as u32);
        match first_layer[particle.index()] {
            None => first_layer[particle.index()] = Some(layer),
            Some(seen) if seen != layer => crossings += 1,
            Some(_) => {}
        }
    }
    crossings
}

fn extract_links<M: DirectedEdgeMesh + ?Sized>(
    mesh: &M,
    weld: &WeldMap,
    config: &TopologyConfig,
) -> MorphoResult<Vec<Link>> {
    let mut candidates: Vec<(u32, u32)> = mesh
        .undirected_edges()
        .into_iter()
        .map(|[a, b]| {
            let p0 = weld.particle_of(a).0;
            let p1 = weld.particle_of(b).0;
            (p0.min(p1), p0.max(p1))
        })
        .collect();

    candidates.sort_unstable_by_key(|&(m0, m1)| pack_key(m0, m1));
    candidates.dedup();

    let mut links = Vec::with_capacity(candidates.len());
    for (m0, m1) in candidates {
        if m0 == m1 {
            return Err(MorphoError::DegenerateGeometry(format!(
                "Mesh edge collapses onto particle {m0} after welding"
            )));
        }
        let rest_length = (weld.particles[m0 as usize] - weld.particles[m1 as usize]).length();
        if rest_length <= config.min_rest_length {
            return Err(MorphoError::DegenerateGeometry(format!(
                "Link {m0}-{m1} has rest length {rest_length:e}"
            )));
        }
        links.push(Link {
            m0: ParticleId(m0),
            m1: ParticleId(m1),
            rest_length,
        });
    }
    Ok(links)
}

fn extract_cells<M: DirectedEdgeMesh + ?Sized>(
    mesh: &M,
    weld: &WeldMap,
    cell_count: usize,
    config: &TopologyConfig,
) -> MorphoResult<Vec<FiniteElementCell>> {
    let edge_count = mesh.half_edge_count();
    let mut visited = vec![false; edge_count];
    let mut slots: Vec<Option<FiniteElementCell>> = vec![None; cell_count];
    let mut stack: Vec<HalfEdgeId> = Vec::with_capacity(config.max_fan_stack);

    for start in (0..edge_count as u32).map(HalfEdgeId) {
        if visited[start.index()] || mesh.incident_face(start).is_none() {
            continue;
        }

        let layer = mesh.vertex_layer(mesh.origin(start));
        let mut fan: Vec<ParticleId> = Vec::with_capacity(4);
        stack.clear();
        stack.push(start);

        while let Some(point_edge) = stack.pop() {
            if visited[point_edge.index()] || mesh.incident_face(point_edge).is_none() {
                continue;
            }

            let particle = weld.particle_of(mesh.origin(point_edge));
            if fan.contains(&particle) {
                return Err(MorphoError::MalformedTopology(format!(
                    "Fan from half-edge {} reaches particle {} twice",
                    start.0, particle.0
                )));
            }
            if fan.len() == 4 {
                return Err(MorphoError::MalformedTopology(format!(
                    "Fan from half-edge {} spans more than 4 vertices",
                    start.0
                )));
            }
            fan.push(particle);

            // Circulate the outgoing edges of this vertex.
            let mut walker = point_edge;
            let mut steps = 0;
            loop {
                if mesh.vertex_layer(mesh.origin(walker)) != layer {
                    return Err(MorphoError::MalformedTopology(format!(
                        "Fan from half-edge {} crosses from layer {} into layer {}",
                        start.0,
                        layer.0,
                        mesh.vertex_layer(mesh.origin(walker)).0
                    )));
                }
                if !visited[walker.index()] {
                    visited[walker.index()] = true;
                    if stack.len() >= config.max_fan_stack {
                        return Err(MorphoError::MalformedTopology(format!(
                            "Fan from half-edge {} exceeds the {}-entry traversal stack",
                            start.0, config.max_fan_stack
                        )));
                    }
                    stack.push(mesh.twin(walker));
                }
                walker = mesh.next_around_vertex(walker);
                steps += 1;
                if walker == point_edge {
                    break;
                }
                if steps > edge_count {
                    return Err(MorphoError::MalformedTopology(format!(
                        "Edges around vertex {} never close into a cycle",
                        mesh.origin(point_edge)
                    )));
                }
            }
        }

        let indices: [ParticleId; 4] = fan.as_slice().try_into().map_err(|_| {
            MorphoError::MalformedTopology(format!(
                "Fan from half-edge {} resolves to {} particles, expected 4",
                start.0,
                fan.len()
            ))
        })?;

        let slot = &mut slots[layer.index()];
        if slot.is_some() {
            return Err(MorphoError::MalformedTopology(format!(
                "Layer {} produces more than one cell",
                layer.0
            )));
        }
        *slot = Some(orient_cell(indices, layer, &weld.particles, config)?);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(layer, cell)| {
            cell.ok_or_else(|| {
                MorphoError::MalformedTopology(format!("Layer {layer} produces no cell"))
            })
        })
        .collect()
}

/// Fixes the cell's orientation: a negative signed volume swaps the first
/// two indices. This is the only place orientation is decided.
fn orient_cell(
    mut indices: [ParticleId; 4],
    layer: LayerId,
    particles: &[Vec3],
    config: &TopologyConfig,
) -> MorphoResult<FiniteElementCell> {
    let mut volume = signed_volume(indices.map(|i| particles[i.index()]));
    if volume < 0.0 {
        volume = -volume;
        indices.swap(0, 1);
    }
    if volume <= config.min_rest_volume {
        return Err(MorphoError::DegenerateGeometry(format!(
            "Cell in layer {} has rest volume {volume:e}",
            layer.0
        )));
    }
    Ok(FiniteElementCell {
        indices,
        rest_volume: volume,
        layer,
    })
}
