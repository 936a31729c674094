//! # morpho-solver
//!
//! Soft-body state and the sub-stepped spring/volume integrator.
//!
//! ## Key Types
//!
//! - [`SoftBody`]: topology, configuration and particle state
//! - [`SoftBodyConfig`]: spring, damper and volumetric constants
//! - [`CarrierBody`]: rigid carrier whose force and torque drive the body
//! - [`CollisionResolver`] / [`ContactField`]: the collision seam
//! - [`StepReport`]: per-step diagnostics

pub mod body;
pub mod carrier;
pub mod config;
pub mod contact;
pub mod debug_draw;
pub mod integrator;
mod scratch;
pub mod state;

pub use body::SoftBody;
pub use carrier::CarrierBody;
pub use config::SoftBodyConfig;
pub use contact::{CollisionResolver, ContactField, ContactFrame, NoContacts};
pub use integrator::StepReport;
pub use state::ParticleState;
