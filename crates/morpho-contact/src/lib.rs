//! # morpho-contact
//!
//! Collision resolvers for the Morpho integrator.
//!
//! A resolver runs once per world step and writes a contact frame per
//! particle: constrained directions the integrator projects accelerations
//! out of, plus a colliding acceleration added afterwards.
//!
//! - [`NullResolver`]: no contacts.
//! - [`GroundPlaneResolver`]: a half-space floor with friction.

pub mod ground_plane;
pub mod null;

pub use ground_plane::GroundPlaneResolver;
pub use null::NullResolver;
