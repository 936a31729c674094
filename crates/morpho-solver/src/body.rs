//! Soft body: topology, configuration and particle state in one owner.

use tracing::{debug, info};

use morpho_math::tetra::signed_volume;
use morpho_math::Vec3;
use morpho_mesh::{FiniteElementCell, HalfEdgeMesh, Link, SoftTopology, TriangleMesh};
use morpho_types::{MorphoError, MorphoResult};

use crate::config::SoftBodyConfig;
use crate::contact::ContactField;
use crate::scratch::StepScratch;
use crate::state::ParticleState;

/// A deformable body of unit-mass particles joined by springs and
/// tetrahedral volume cells.
///
/// Rest lengths and rest volumes come from the topology and never change.
/// Particle positions are in the carrier's local frame.
#[derive(Debug, Clone)]
pub struct SoftBody {
    pub(crate) topology: SoftTopology,
    pub(crate) config: SoftBodyConfig,
    pub(crate) state: ParticleState,
    pub(crate) contacts: ContactField,
    pub(crate) scratch: StepScratch,
    pub(crate) steps: u64,
}

impl SoftBody {
    /// Builds a body from a layered triangle mesh.
    ///
    /// Runs half-edge construction and topology extraction with
    /// `config.topology`; particles start at rest at their welded positions.
    pub fn build(mesh: &TriangleMesh, config: SoftBodyConfig) -> MorphoResult<Self> {
        config.validate()?;
        let half_edges = HalfEdgeMesh::from_triangle_mesh(mesh)?;
        let topology = SoftTopology::build(&half_edges, &config.topology)?;
        Self::from_topology(topology, config)
    }

    /// Wraps a pre-built topology.
    pub fn from_topology(topology: SoftTopology, config: SoftBodyConfig) -> MorphoResult<Self> {
        config.validate()?;
        check_topology(&topology)?;

        let n = topology.particle_count();
        let body = Self {
            state: ParticleState::at_rest(topology.particles.clone()),
            contacts: ContactField::new(n),
            scratch: StepScratch::new(n, topology.link_count()),
            topology,
            config,
            steps: 0,
        };

        info!(
            particles = body.particle_count(),
            links = body.link_count(),
            cells = body.cell_count(),
            substeps = body.config.substeps,
            "soft body created"
        );
        Ok(body)
    }

    /// Restoring a body from bytes is not supported.
    pub fn from_serialized(bytes: &[u8]) -> MorphoResult<Self> {
        debug!(len = bytes.len(), "rejecting serialized soft body");
        Err(MorphoError::Unsupported(
            "Soft bodies cannot be restored from serialized data".into(),
        ))
    }

    /// Number of particles.
    pub fn particle_count(&self) -> usize {
        self.state.particle_count()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.topology.link_count()
    }

    /// Number of finite-element cells.
    pub fn cell_count(&self) -> usize {
        self.topology.cell_count()
    }

    /// Completed world steps.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &SoftBodyConfig {
        &self.config
    }

    pub fn topology(&self) -> &SoftTopology {
        &self.topology
    }

    pub fn links(&self) -> &[Link] {
        &self.topology.links
    }

    pub fn cells(&self) -> &[FiniteElementCell] {
        &self.topology.cells
    }

    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    /// Mutable particle positions, for seeding perturbations.
    ///
    /// Only slices are handed out so the particle count stays fixed.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.state.positions
    }

    /// Mutable particle velocities.
    pub fn velocities_mut(&mut self) -> &mut [Vec3] {
        &mut self.state.velocities
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.state.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.state.velocities
    }

    pub fn accelerations(&self) -> &[Vec3] {
        &self.state.accelerations
    }

    /// Contact frames written by the resolver in the last step.
    pub fn contacts(&self) -> &ContactField {
        &self.contacts
    }

    /// Puts every particle back at its rest position with zero velocity.
    pub fn reset_to_rest(&mut self) {
        self.state = ParticleState::at_rest(self.topology.particles.clone());
        self.contacts.reset();
        self.steps = 0;
    }

    /// Current signed volume of cell `i`, in the rest-volume unit.
    pub fn cell_volume(&self, i: usize) -> Option<f32> {
        let cell = self.topology.cells.get(i)?;
        Some(signed_volume(
            cell.indices.map(|p| self.state.positions[p.index()]),
        ))
    }

    /// Sum over cells of `|volume - rest_volume|`.
    pub fn volume_drift(&self) -> f64 {
        (0..self.cell_count())
            .filter_map(|i| {
                let rest = self.topology.cells[i].rest_volume;
                self.cell_volume(i).map(|v| f64::from((v - rest).abs()))
            })
            .sum()
    }

    /// Kinetic energy of the particles (unit mass).
    pub fn kinetic_energy(&self) -> f64 {
        self.state.kinetic_energy()
    }

    /// Spring potential: 0.5 * ks * Σ (l - rest)².
    pub fn elastic_energy(&self) -> f64 {
        let ks = f64::from(self.config.spring_stiffness);
        let stretch: f64 = self
            .topology
            .links
            .iter()
            .map(|link| {
                let l = (self.state.positions[link.m0.index()]
                    - self.state.positions[link.m1.index()])
                .length();
                let e = f64::from(l - link.rest_length);
                e * e
            })
            .sum();
        0.5 * ks * stretch
    }
}

/// Rejects topologies the integrator cannot advance: out-of-range or
/// repeated indices, links not strictly sorted by key, and cells with a
/// negative rest volume.
fn check_topology(topology: &SoftTopology) -> MorphoResult<()> {
    let n = topology.particle_count();
    for link in &topology.links {
        if link.m0 >= link.m1 || link.m1.index() >= n {
            return Err(MorphoError::MalformedTopology(format!(
                "Link {}-{} is invalid for {n} particles",
                link.m0.0, link.m1.0
            )));
        }
    }
    if let Some(pair) = topology
        .links
        .windows(2)
        .find(|pair| pair[0].key() >= pair[1].key())
    {
        return Err(MorphoError::MalformedTopology(format!(
            "Links {}-{} and {}-{} are duplicated or out of order",
            pair[0].m0.0, pair[0].m1.0, pair[1].m0.0, pair[1].m1.0
        )));
    }
    for cell in &topology.cells {
        let layer = cell.layer.0;
        if cell.indices.iter().any(|p| p.index() >= n) {
            return Err(MorphoError::MalformedTopology(format!(
                "Cell in layer {layer} references a particle beyond {n}"
            )));
        }
        let [a, b, c, d] = cell.indices;
        if a == b || a == c || a == d || b == c || b == d || c == d {
            return Err(MorphoError::MalformedTopology(format!(
                "Cell in layer {layer} repeats a particle"
            )));
        }
        if cell.rest_volume < 0.0 || cell.rest_volume.is_nan() {
            return Err(MorphoError::MalformedTopology(format!(
                "Cell in layer {layer} has rest volume {}",
                cell.rest_volume
            )));
        }
    }
    Ok(())
}
