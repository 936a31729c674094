//! Strongly-typed identifiers for simulation entities.
//!
//! Newtype wrappers keep welded particle indices apart from raw mesh
//! vertex indices and half-edge indices.

use serde::{Deserialize, Serialize};

/// Index into the welded particle arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticleId(pub u32);

/// Index into a mesh's half-edge array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HalfEdgeId(pub u32);

/// Layer tag partitioning mesh geometry into disjoint volumetric regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u32);

impl ParticleId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl HalfEdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl LayerId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ParticleId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for HalfEdgeId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for LayerId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
