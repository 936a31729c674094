//! # morpho-mesh
//!
//! Layered tetrahedral meshes and the topology builder that turns them
//! into particles, links and finite-element cells.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`]: SoA positions, per-vertex layer tags, triangle indices.
//! - [`HalfEdgeMesh`] / [`DirectedEdgeMesh`]: directed-edge traversal.
//! - [`SoftTopology`]: welded particles, sorted unique links, oriented cells.
//! - Procedural generators for tetrahedra, cubes and cube columns.

pub mod generators;
pub mod half_edge;
pub mod mesh;
pub mod topology;
pub mod weld;

pub use half_edge::{DirectedEdgeMesh, HalfEdgeMesh};
pub use mesh::TriangleMesh;
pub use topology::{FiniteElementCell, Link, SoftTopology, TopologyConfig};
