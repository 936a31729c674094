//! # morpho-types
//!
//! Shared identifiers, error types, and simulation constants
//! for the Morpho deformable-body core.
//!
//! This crate has zero domain logic; it defines the vocabulary
//! that all other Morpho crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{MorphoError, MorphoResult};
pub use ids::{HalfEdgeId, LayerId, ParticleId};
