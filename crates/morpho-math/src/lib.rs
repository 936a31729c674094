//! # morpho-math
//!
//! Linear algebra primitives for the Morpho deformable-body core.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Mat3`, etc.)
//! - Tetrahedron signed volume and its per-vertex gradient
//!
//! All vector math is 3-component `Vec3`; there is no fourth lane to
//! keep zeroed for cross and dot products.

pub mod tetra;

// Re-export glam types as the canonical math types for Morpho.
pub use glam::{Affine3A, Mat3, Quat, Vec3};
