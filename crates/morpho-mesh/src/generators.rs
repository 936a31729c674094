//! Procedural mesh generators for benchmarks and testing.
//!
//! Every tetrahedron is emitted as its own closed shell of four outward
//! facing triangles with its own four vertices and layer tag. Shells that
//! touch share coincident (not identical) vertices; the topology builder
//! welds them.

use morpho_math::Vec3;

use crate::mesh::TriangleMesh;

/// Outward-facing triangles of a positively oriented tetrahedron `[a, b, c, d]`.
const SHELL_FACES: [[u32; 3]; 4] = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];

/// Appends one tetrahedral shell tagged with `layer`.
///
/// Corner order is free; the winding is corrected so faces point outward.
pub fn push_tetrahedron(mesh: &mut TriangleMesh, corners: [Vec3; 4], layer: u32) {
    let [a, mut b, mut c, d] = corners;
    if (b - a).dot((c - a).cross(d - a)) < 0.0 {
        std::mem::swap(&mut b, &mut c);
    }

    let base = mesh.vertex_count() as u32;
    for p in [a, b, c, d] {
        mesh.push_vertex(p, layer);
    }
    for face in SHELL_FACES {
        mesh.indices.extend(face.iter().map(|&k| base + k));
    }
}

/// Generates a single corner tetrahedron with legs of length `size`
/// along +X, +Y and +Z from `origin`.
///
/// # Example
/// ```
/// use morpho_mesh::generators::tetrahedron;
/// use morpho_math::Vec3;
/// let mesh = tetrahedron(Vec3::ZERO, 1.0, 0);
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.triangle_count(), 4);
/// ```
pub fn tetrahedron(origin: Vec3, size: f32, layer: u32) -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(4, 4);
    push_tetrahedron(
        &mut mesh,
        [
            origin,
            origin + Vec3::X * size,
            origin + Vec3::Y * size,
            origin + Vec3::Z * size,
        ],
        layer,
    );
    mesh
}

/// Corner `i` of an axis-aligned cube, with bit 0/1/2 selecting +X/+Y/+Z.
fn cube_corner(origin: Vec3, size: f32, i: usize) -> Vec3 {
    origin
        + Vec3::new(
            (i & 1) as f32,
            ((i >> 1) & 1) as f32,
            ((i >> 2) & 1) as f32,
        ) * size
}

/// Five-tetrahedron cube decomposition: four corner tets plus the
/// central tet on the face diagonals.
const CUBE_TETS: [[usize; 4]; 5] = [
    [0, 1, 2, 4],
    [3, 1, 2, 7],
    [5, 1, 4, 7],
    [6, 2, 4, 7],
    [1, 2, 4, 7],
];

fn push_cube(mesh: &mut TriangleMesh, origin: Vec3, size: f32, first_layer: u32) {
    for (k, tet) in CUBE_TETS.iter().enumerate() {
        let corners = tet.map(|i| cube_corner(origin, size, i));
        push_tetrahedron(mesh, corners, first_layer + k as u32);
    }
}

/// Generates a cube of edge `size` at `origin` split into five
/// tetrahedral shells, layers `first_layer..first_layer + 5`.
///
/// Welds down to 8 particles, 18 links and 5 cells.
pub fn cube_block(origin: Vec3, size: f32, first_layer: u32) -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(20, 20);
    push_cube(&mut mesh, origin, size, first_layer);
    mesh
}

/// Generates `count` cubes stacked along +Y from the origin, touching
/// at shared faces, with five layers per cube.
pub fn cube_column(count: usize, size: f32) -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(20 * count, 20 * count);
    for k in 0..count {
        let origin = Vec3::new(0.0, k as f32 * size, 0.0);
        push_cube(&mut mesh, origin, size, (k * CUBE_TETS.len()) as u32);
    }
    mesh
}
