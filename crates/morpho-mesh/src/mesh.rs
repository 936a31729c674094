//! Layered triangle mesh with SoA (Structure of Arrays) layout.
//!
//! Each coordinate channel is stored contiguously:
//! - `pos_x: [x0, x1, x2, ...]`
//! - `pos_y: [y0, y1, y2, ...]`
//! - `pos_z: [z0, z1, z2, ...]`
//!
//! Alongside positions every vertex carries a layer tag. A layer is one
//! closed tetrahedral shell; coincident vertices of neighbouring shells
//! stay separate here and are welded later by the topology builder.

use serde::{Deserialize, Serialize};
use morpho_types::{MorphoError, MorphoResult};

/// A layered triangle mesh stored in Structure-of-Arrays layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    // --- Vertex data (SoA) ---
    /// X coordinates of all vertices.
    pub pos_x: Vec<f32>,
    /// Y coordinates of all vertices.
    pub pos_y: Vec<f32>,
    /// Z coordinates of all vertices.
    pub pos_z: Vec<f32>,

    /// Per-vertex layer tag.
    pub layers: Vec<u32>,

    // --- Triangle data ---
    /// Triangle indices, each triangle is [v0, v1, v2].
    /// Stored flat: `[t0v0, t0v1, t0v2, t1v0, t1v1, t1v2, ...]`
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of vertex `i` as `[x, y, z]`.
    #[inline]
    pub fn position(&self, i: usize) -> [f32; 3] {
        [self.pos_x[i], self.pos_y[i], self.pos_z[i]]
    }

    /// Returns the position as a `glam::Vec3`.
    #[inline]
    pub fn position_vec3(&self, i: usize) -> morpho_math::Vec3 {
        morpho_math::Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Largest layer tag, or `None` for an empty mesh.
    pub fn max_layer(&self) -> Option<u32> {
        self.layers.iter().copied().max()
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, p: morpho_math::Vec3, layer: u32) -> u32 {
        let index = self.pos_x.len() as u32;
        self.pos_x.push(p.x);
        self.pos_y.push(p.y);
        self.pos_z.push(p.z);
        self.layers.push(layer);
        index
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(vertex_capacity),
            pos_y: Vec::with_capacity(vertex_capacity),
            pos_z: Vec::with_capacity(vertex_capacity),
            layers: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All SoA arrays have the same length
    /// - Triangle indices are within bounds
    /// - No triangle repeats a vertex index
    pub fn validate(&self) -> MorphoResult<()> {
        let n = self.pos_x.len();

        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(MorphoError::InvalidMesh(
                "Position arrays have inconsistent lengths".into(),
            ));
        }
        if self.layers.len() != n {
            return Err(MorphoError::InvalidMesh(format!(
                "Layer tag count ({}) != vertex count ({})",
                self.layers.len(),
                n
            )));
        }

        if self.indices.len() % 3 != 0 {
            return Err(MorphoError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(MorphoError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            if a == b || b == c || a == c {
                return Err(MorphoError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        Ok(())
    }

    /// Constructs a mesh from interleaved AoS position data.
    ///
    /// Converts `[x0, y0, z0, x1, y1, z1, ...]` to SoA layout. `layers`
    /// must hold one tag per vertex.
    pub fn from_interleaved(
        positions: &[f32],
        indices: &[u32],
        layers: &[u32],
    ) -> MorphoResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(MorphoError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mut mesh = Self::with_capacity(n, indices.len() / 3);

        for chunk in positions.chunks_exact(3) {
            mesh.pos_x.push(chunk[0]);
            mesh.pos_y.push(chunk[1]);
            mesh.pos_z.push(chunk[2]);
        }

        mesh.layers = layers.to_vec();
        mesh.indices = indices.to_vec();

        mesh.validate()?;
        Ok(mesh)
    }
}
