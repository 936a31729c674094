//! Benchmark scenarios: a mesh, a body config and the carrier loading
//! for each case.
//!
//! Three canonical scenarios for regression testing:
//! 1. **Resting tetrahedron**: a single cell with no load; nothing should move
//! 2. **Dropped column**: two stacked cubes fall onto a ground plane
//! 3. **Spun block**: one cube spun up by a carrier torque impulse

use serde::{Deserialize, Serialize};

use morpho_contact::GroundPlaneResolver;
use morpho_math::Vec3;
use morpho_mesh::generators::{cube_block, cube_column, tetrahedron};
use morpho_mesh::TriangleMesh;
use morpho_solver::{CarrierBody, SoftBodyConfig};
use morpho_types::constants::DEFAULT_DT;

/// Standard gravity applied through the carrier (m/s²).
const GRAVITY: f32 = 9.81;

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Unloaded tetrahedron at rest.
    RestingTetrahedron,
    /// Cube column dropped onto the ground.
    DroppedColumn,
    /// Cube spun about +Y by a torque impulse.
    SpunBlock,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::RestingTetrahedron,
            ScenarioKind::DroppedColumn,
            ScenarioKind::SpunBlock,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::RestingTetrahedron => "resting_tetrahedron",
            ScenarioKind::DroppedColumn => "dropped_column",
            ScenarioKind::SpunBlock => "spun_block",
        }
    }
}

/// A fully specified benchmark scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// Layered input mesh.
    pub mesh: TriangleMesh,
    /// Body configuration.
    pub config: SoftBodyConfig,
    /// Carrier state at the first step.
    pub carrier: CarrierBody,
    /// Force applied to the carrier before every step.
    pub carrier_force: Vec3,
    /// Torque applied to the carrier before the first step only.
    pub torque_impulse: Vec3,
    /// Optional floor. Without one the body runs contact-free.
    pub ground: Option<GroundPlaneResolver>,
    /// Number of timesteps to simulate.
    pub timesteps: u32,
    /// Timestep size (seconds).
    pub dt: f32,
}

impl Scenario {
    /// Create the resting tetrahedron scenario.
    ///
    /// One unit tetrahedron with no carrier load for 1 second at 60fps.
    /// Every particle should stay exactly where it started.
    pub fn resting_tetrahedron() -> Self {
        Self {
            kind: ScenarioKind::RestingTetrahedron,
            mesh: tetrahedron(Vec3::ZERO, 1.0, 0),
            config: SoftBodyConfig::default(),
            carrier: CarrierBody::default(),
            carrier_force: Vec3::ZERO,
            torque_impulse: Vec3::ZERO,
            ground: None,
            timesteps: 60,
            dt: DEFAULT_DT,
        }
    }

    /// Create the dropped column scenario.
    ///
    /// Two unit cubes stacked along +Y, lifted 0.5m above a horizontal
    /// ground plane with friction 0.5, falling under gravity for 3 seconds.
    pub fn dropped_column() -> Self {
        let mut mesh = cube_column(2, 1.0);
        for y in &mut mesh.pos_y {
            *y += 0.5;
        }
        Self {
            kind: ScenarioKind::DroppedColumn,
            mesh,
            config: SoftBodyConfig::default(),
            carrier: CarrierBody::default(),
            carrier_force: Vec3::new(0.0, -GRAVITY, 0.0),
            torque_impulse: Vec3::ZERO,
            ground: Some(GroundPlaneResolver::horizontal(0.0)),
            timesteps: 180,
            dt: DEFAULT_DT,
        }
    }

    /// Create the spun block scenario.
    ///
    /// A unit cube centred on the carrier origin receives a single +Y
    /// torque impulse worth 3 rad/s, then spins down under link damping
    /// for 2 seconds.
    pub fn spun_block() -> Self {
        let dt = DEFAULT_DT;
        Self {
            kind: ScenarioKind::SpunBlock,
            mesh: cube_block(Vec3::splat(-0.5), 1.0, 0),
            config: SoftBodyConfig::default(),
            carrier: CarrierBody::default(),
            carrier_force: Vec3::ZERO,
            torque_impulse: Vec3::new(0.0, 3.0 / dt, 0.0),
            ground: None,
            timesteps: 120,
            dt,
        }
    }

    /// Create a scenario from its kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::RestingTetrahedron => Self::resting_tetrahedron(),
            ScenarioKind::DroppedColumn => Self::dropped_column(),
            ScenarioKind::SpunBlock => Self::spun_block(),
        }
    }
}
