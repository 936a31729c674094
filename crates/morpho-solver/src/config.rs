//! Integrator configuration.
//!
//! Spring, damper and volumetric constants shared by every link and cell
//! of a body, plus the sub-step count and the topology tolerances used
//! when the body is built.

use serde::{Deserialize, Serialize};

use morpho_mesh::TopologyConfig;
use morpho_types::constants::{
    DEFAULT_DAMPER, DEFAULT_SPRING_STIFFNESS, DEFAULT_SUBSTEPS, REFERENCE_VOLUMETRIC_STIFFNESS,
};
use morpho_types::{MorphoError, MorphoResult};

/// Configuration for a soft body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftBodyConfig {
    /// Spring constant `ks` (s⁻², acts on unit-mass particles).
    pub spring_stiffness: f32,

    /// Damper constant `kd` (s⁻¹).
    pub damper: f32,

    /// Volumetric stiffness. Zero disables the cell term.
    pub volumetric_stiffness: f32,

    /// Integrator sub-steps per world step. Zero runs none.
    pub substeps: u32,

    /// Tolerances for topology extraction.
    #[serde(default)]
    pub topology: TopologyConfig,
}

impl Default for SoftBodyConfig {
    fn default() -> Self {
        Self {
            spring_stiffness: DEFAULT_SPRING_STIFFNESS,
            damper: DEFAULT_DAMPER,
            volumetric_stiffness: 0.0,
            substeps: DEFAULT_SUBSTEPS,
            topology: TopologyConfig::default(),
        }
    }
}

impl SoftBodyConfig {
    /// Creates a config for debugging (a single sub-step per world step).
    pub fn debug() -> Self {
        Self {
            substeps: 1,
            ..Default::default()
        }
    }

    /// Creates a config with the volumetric cell term switched on.
    ///
    /// [`REFERENCE_VOLUMETRIC_STIFFNESS`] is the value the term was tuned
    /// with. At the default sub-step count that value is only stable for
    /// much smaller timesteps than 1/60 s.
    pub fn volume_preserving(volumetric_stiffness: f32) -> Self {
        Self {
            volumetric_stiffness,
            ..Default::default()
        }
    }

    /// Rejects negative or non-finite constants.
    pub fn validate(&self) -> MorphoResult<()> {
        for (name, value) in [
            ("spring_stiffness", self.spring_stiffness),
            ("damper", self.damper),
            ("volumetric_stiffness", self.volumetric_stiffness),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MorphoError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        self.topology.validate()
    }
}
