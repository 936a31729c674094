//! Directed-edge (half-edge) mesh and the traversal contract the
//! topology builder consumes.
//!
//! Every triangle contributes three half-edges linked by `next`. Each
//! half-edge has a `twin` running the opposite way; where a mesh edge
//! borders only one triangle, the twin is a face-less boundary half-edge
//! and boundary half-edges are chained into loops. With that closure
//! `next(twin(e))` always circulates the outgoing edges of `e`'s origin.

use std::collections::HashMap;

use morpho_math::Vec3;
use morpho_types::{HalfEdgeId, LayerId, MorphoError, MorphoResult};

use crate::mesh::TriangleMesh;

/// Traversal contract over a mesh with directed edges and layer tags.
///
/// The topology builder only ever talks to a mesh through this trait.
pub trait DirectedEdgeMesh {
    /// Number of raw (unwelded) vertices.
    fn vertex_count(&self) -> usize;

    /// Position of raw vertex `v`.
    fn vertex_position(&self, v: u32) -> Vec3;

    /// Layer tag of raw vertex `v`.
    fn vertex_layer(&self, v: u32) -> LayerId;

    /// Number of half-edges, boundary half-edges included.
    fn half_edge_count(&self) -> usize;

    /// Vertex the half-edge leaves from.
    fn origin(&self, e: HalfEdgeId) -> u32;

    /// Opposite half-edge.
    fn twin(&self, e: HalfEdgeId) -> HalfEdgeId;

    /// Next half-edge around the same face (or boundary loop).
    fn next(&self, e: HalfEdgeId) -> HalfEdgeId;

    /// Face the half-edge borders, `None` for boundary half-edges.
    fn incident_face(&self, e: HalfEdgeId) -> Option<u32>;

    /// Next outgoing half-edge around `origin(e)`.
    fn next_around_vertex(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.next(self.twin(e))
    }

    /// Every undirected edge exactly once, as `[origin, destination]`
    /// of its lower-numbered half-edge.
    fn undirected_edges(&self) -> Vec<[u32; 2]> {
        (0..self.half_edge_count() as u32)
            .map(HalfEdgeId)
            .filter(|&e| e < self.twin(e))
            .map(|e| [self.origin(e), self.origin(self.twin(e))])
            .collect()
    }
}

/// One directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// Vertex this half-edge leaves from.
    pub origin: u32,
    /// Opposite half-edge.
    pub twin: HalfEdgeId,
    /// Next half-edge in the face or boundary loop.
    pub next: HalfEdgeId,
    /// Incident triangle, `None` on the boundary.
    pub face: Option<u32>,
}

/// Half-edge mesh built from a layered [`TriangleMesh`].
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    positions: Vec<Vec3>,
    layers: Vec<LayerId>,
    edges: Vec<HalfEdge>,
    face_count: usize,
}

const UNSET: HalfEdgeId = HalfEdgeId(u32::MAX);

impl HalfEdgeMesh {
    /// Builds the half-edge structure.
    ///
    /// Fails with `MalformedTopology` when two faces use the same directed
    /// edge or a vertex has more than one outgoing boundary edge.
    pub fn from_triangle_mesh(mesh: &TriangleMesh) -> MorphoResult<Self> {
        mesh.validate()?;

        let tri_count = mesh.triangle_count();
        let mut edges: Vec<HalfEdge> = Vec::with_capacity(tri_count * 3);
        let mut directed: HashMap<(u32, u32), u32> = HashMap::with_capacity(tri_count * 3);

        for t in 0..tri_count {
            let tri = mesh.triangle(t);
            let base = (t * 3) as u32;
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let id = base + k as u32;
                if directed.insert((a, b), id).is_some() {
                    return Err(MorphoError::MalformedTopology(format!(
                        "Directed edge {a}->{b} is used by more than one face (triangle {t})"
                    )));
                }
                edges.push(HalfEdge {
                    origin: a,
                    twin: UNSET,
                    next: HalfEdgeId(base + ((k + 1) % 3) as u32),
                    face: Some(t as u32),
                });
            }
        }

        // Pair twins; open edges get a boundary half-edge.
        let interior_count = edges.len();
        let mut boundary_from: HashMap<u32, u32> = HashMap::new();
        for id in 0..interior_count {
            let a = edges[id].origin;
            let b = edges[edges[id].next.index()].origin;
            match directed.get(&(b, a)) {
                Some(&twin) => edges[id].twin = HalfEdgeId(twin),
                None => {
                    let boundary = edges.len() as u32;
                    edges.push(HalfEdge {
                        origin: b,
                        twin: HalfEdgeId(id as u32),
                        next: UNSET,
                        face: None,
                    });
                    edges[id].twin = HalfEdgeId(boundary);
                    if boundary_from.insert(b, boundary).is_some() {
                        return Err(MorphoError::MalformedTopology(format!(
                            "Vertex {b} has more than one outgoing boundary edge"
                        )));
                    }
                }
            }
        }

        // Chain boundary loops: b->a continues with the boundary edge leaving a.
        for id in interior_count..edges.len() {
            let dest = edges[edges[id].twin.index()].origin;
            let next = boundary_from.get(&dest).ok_or_else(|| {
                MorphoError::MalformedTopology(format!(
                    "Boundary loop is open at vertex {dest}"
                ))
            })?;
            edges[id].next = HalfEdgeId(*next);
        }

        let positions = (0..mesh.vertex_count())
            .map(|i| mesh.position_vec3(i))
            .collect();
        let layers = mesh.layers.iter().copied().map(LayerId).collect();

        Ok(Self {
            positions,
            layers,
            edges,
            face_count: tri_count,
        })
    }

    /// Returns the number of triangles.
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Returns the half-edge record for `e`.
    pub fn half_edge(&self, e: HalfEdgeId) -> &HalfEdge {
        &self.edges[e.index()]
    }

    /// Number of face-less boundary half-edges.
    pub fn boundary_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.face.is_none()).count()
    }

    /// Returns true if every edge borders two faces.
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}

impl DirectedEdgeMesh for HalfEdgeMesh {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn vertex_position(&self, v: u32) -> Vec3 {
        self.positions[v as usize]
    }

    fn vertex_layer(&self, v: u32) -> LayerId {
        self.layers[v as usize]
    }

    fn half_edge_count(&self) -> usize {
        self.edges.len()
    }

    fn origin(&self, e: HalfEdgeId) -> u32 {
        self.edges[e.index()].origin
    }

    fn twin(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.edges[e.index()].twin
    }

    fn next(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.edges[e.index()].next
    }

    fn incident_face(&self, e: HalfEdgeId) -> Option<u32> {
        self.edges[e.index()].face
    }
}
