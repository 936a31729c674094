//! Simulation event types.
//!
//! Structured events emitted around each soft-body step. Events are
//! lightweight value types that carry just enough data to be useful for
//! monitoring and debugging.

use serde::{Deserialize, Serialize};

/// A simulation event tagged with the step it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Step number (0-indexed).
    pub step: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A soft body finished construction.
    BodyBuilt {
        particles: usize,
        links: usize,
        cells: usize,
    },

    /// Step started.
    StepBegin {
        /// Simulation time at the start of the step (seconds).
        sim_time: f64,
    },

    /// Step completed.
    StepEnd {
        /// Wall-clock time for the step (seconds).
        wall_time: f64,
        /// Sub-steps run.
        substeps: u32,
        /// Largest per-particle velocity change.
        max_velocity_change: f32,
    },

    /// Collision resolver ran.
    ContactResolution {
        /// Resolver name.
        resolver: String,
        /// Particles it constrained.
        active_contacts: usize,
    },

    /// Energy snapshot at the current state.
    Energy {
        /// Kinetic energy (unit particle mass).
        kinetic: f64,
        /// Spring potential energy.
        elastic: f64,
    },

    /// The integrator hit a numeric guard.
    NumericWarning {
        /// Link evaluations clamped by the length floor.
        clamped_links: usize,
        /// Particles with non-finite state.
        non_finite_particles: usize,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl EventKind {
    /// Short stable name of the variant.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BodyBuilt { .. } => "body_built",
            Self::StepBegin { .. } => "step_begin",
            Self::StepEnd { .. } => "step_end",
            Self::ContactResolution { .. } => "contact_resolution",
            Self::Energy { .. } => "energy",
            Self::NumericWarning { .. } => "numeric_warning",
            Self::Custom { .. } => "custom",
        }
    }
}

impl SimulationEvent {
    /// Creates a new event for the given step.
    pub fn new(step: u64, kind: EventKind) -> Self {
        Self { step, kind }
    }

    /// Returns true for events that flag a numeric problem.
    pub fn is_warning(&self) -> bool {
        matches!(self.kind, EventKind::NumericWarning { .. })
    }
}
