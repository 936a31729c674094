//! Integration tests for morpho-mesh.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use morpho_math::tetra::signed_volume;
use morpho_math::Vec3;
use morpho_mesh::generators::{cube_block, cube_column, push_tetrahedron, tetrahedron};
use morpho_mesh::half_edge::DirectedEdgeMesh;
use morpho_mesh::topology::pack_key;
use morpho_mesh::weld::{coincident, weld_vertices};
use morpho_mesh::{HalfEdgeMesh, SoftTopology, TopologyConfig, TriangleMesh};
use morpho_types::{HalfEdgeId, LayerId, MorphoError};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

fn build(mesh: &TriangleMesh) -> Result<SoftTopology, MorphoError> {
    let he = HalfEdgeMesh::from_triangle_mesh(mesh)?;
    SoftTopology::build(&he, &TopologyConfig::default())
}

/// Subscriber that counts `WARN` events on the current thread.
struct WarnCounter(Arc<AtomicUsize>);

impl Subscriber for WarnCounter {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }
    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }
    fn record(&self, _: &Id, _: &Record<'_>) {}
    fn record_follows_from(&self, _: &Id, _: &Id) {}
    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
    fn enter(&self, _: &Id) {}
    fn exit(&self, _: &Id) {}
}

fn warnings_while_building(mesh: &TriangleMesh) -> usize {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = WarnCounter(Arc::clone(&count));
    tracing::subscriber::with_default(subscriber, || build(mesh).unwrap());
    count.load(Ordering::SeqCst)
}

/// Corner tetrahedron written by hand with inward-facing triangles.
fn inward_tetrahedron() -> TriangleMesh {
    let positions = [
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    ];
    let indices = [0, 1, 2, 0, 3, 1, 1, 3, 2, 0, 2, 3];
    TriangleMesh::from_interleaved(&positions, &indices, &[0; 4]).unwrap()
}

// ─── TriangleMesh Tests ───────────────────────────────────────

#[test]
fn basic_counts() {
    let mesh = tetrahedron(Vec3::ZERO, 1.0, 0);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.max_layer(), Some(0));
}

#[test]
fn from_interleaved_deinterleaves() {
    let mesh = inward_tetrahedron();
    assert_eq!(mesh.pos_x, vec![0.0, 1.0, 0.0, 0.0]);
    assert_eq!(mesh.position(3), [0.0, 0.0, 1.0]);
    assert!(mesh.validate().is_ok());
}

#[test]
fn validate_catches_missing_layers() {
    let mut mesh = tetrahedron(Vec3::ZERO, 1.0, 0);
    mesh.layers.pop();
    assert!(matches!(mesh.validate(), Err(MorphoError::InvalidMesh(_))));
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = tetrahedron(Vec3::ZERO, 1.0, 0);
    mesh.indices[2] = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_repeated_index() {
    let mut mesh = tetrahedron(Vec3::ZERO, 1.0, 0);
    mesh.indices[0] = mesh.indices[1];
    assert!(mesh.validate().is_err());
}

#[test]
fn mesh_serializes() {
    let mesh = tetrahedron(Vec3::ZERO, 1.0, 3);
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: TriangleMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.indices, mesh.indices);
    assert_eq!(recovered.layers, vec![3; 4]);
}

// ─── Half-Edge Tests ──────────────────────────────────────────

#[test]
fn closed_tetrahedron_has_paired_twins() {
    let he = HalfEdgeMesh::from_triangle_mesh(&tetrahedron(Vec3::ZERO, 1.0, 0)).unwrap();
    assert_eq!(he.half_edge_count(), 12);
    assert_eq!(he.face_count(), 4);
    assert!(he.is_closed());
    for e in (0..12).map(HalfEdgeId) {
        let t = he.twin(e);
        assert_ne!(t, e);
        assert_eq!(he.twin(t), e);
        assert_eq!(he.origin(he.next(e)), he.origin(t));
    }
}

#[test]
fn undirected_edges_visit_each_edge_once() {
    let he = HalfEdgeMesh::from_triangle_mesh(&tetrahedron(Vec3::ZERO, 1.0, 0)).unwrap();
    let edges = he.undirected_edges();
    assert_eq!(edges.len(), 6);
    let mut keys: Vec<u64> = edges
        .iter()
        .map(|&[a, b]| pack_key(a.min(b), a.max(b)))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), 6);
}

#[test]
fn circulation_returns_to_start() {
    let he = HalfEdgeMesh::from_triangle_mesh(&tetrahedron(Vec3::ZERO, 1.0, 0)).unwrap();
    let start = HalfEdgeId(0);
    let mut e = start;
    let mut valence = 0;
    loop {
        assert_eq!(he.origin(e), he.origin(start));
        e = he.next_around_vertex(e);
        valence += 1;
        if e == start {
            break;
        }
    }
    assert_eq!(valence, 3);
}

#[test]
fn open_triangle_gets_boundary_loop() {
    let mesh = TriangleMesh::from_interleaved(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        &[0, 1, 2],
        &[0; 3],
    )
    .unwrap();
    let he = HalfEdgeMesh::from_triangle_mesh(&mesh).unwrap();
    assert_eq!(he.boundary_edge_count(), 3);
    assert!(!he.is_closed());
    for e in (3..6).map(HalfEdgeId) {
        assert!(he.incident_face(e).is_none());
        assert!(he.incident_face(he.next(e)).is_none());
    }
}

#[test]
fn duplicate_face_is_malformed() {
    let mut mesh = tetrahedron(Vec3::ZERO, 1.0, 0);
    let first: Vec<u32> = mesh.indices[..3].to_vec();
    mesh.indices.extend(first);
    let err = HalfEdgeMesh::from_triangle_mesh(&mesh).unwrap_err();
    assert!(matches!(err, MorphoError::MalformedTopology(_)));
}

// ─── Weld Tests ───────────────────────────────────────────────

#[test]
fn weld_is_noop_on_distinct_vertices() {
    let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
    let weld = weld_vertices(&points, 1e-5);
    assert_eq!(weld.particle_count(), 4);
    assert_eq!(weld.merged_count(), 0);
    for (v, p) in weld.vertex_to_particle.iter().enumerate() {
        assert_eq!(p.index(), v);
    }
}

#[test]
fn weld_merges_within_tolerance() {
    let points = vec![
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::X,
        Vec3::new(1.0 + 5e-6, 2.0 - 5e-6, 3.0),
    ];
    let weld = weld_vertices(&points, 1e-5);
    assert_eq!(weld.particle_count(), 2);
    assert_eq!(weld.particle_of(2), weld.particle_of(0));
    assert_eq!(weld.particles[0], points[0]);
}

#[test]
fn weld_keeps_points_beyond_tolerance() {
    let points = vec![Vec3::ZERO, Vec3::new(3e-5, 0.0, 0.0)];
    let weld = weld_vertices(&points, 1e-5);
    assert_eq!(weld.particle_count(), 2);
}

#[test]
fn coincidence_is_per_component() {
    assert!(coincident(Vec3::ZERO, Vec3::splat(9e-6), 1e-5));
    assert!(!coincident(Vec3::ZERO, Vec3::new(0.0, 0.0, 2e-5), 1e-5));
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn single_tetrahedron_topology() {
    let topo = build(&tetrahedron(Vec3::ZERO, 1.0, 0)).unwrap();
    assert_eq!(topo.particle_count(), 4);
    assert_eq!(topo.link_count(), 6);
    assert_eq!(topo.cell_count(), 1);
    assert_eq!(topo.cross_layer_welds, 0);
}

#[test]
fn cube_block_welds_shared_corners() {
    let mesh = cube_block(Vec3::ZERO, 1.0, 0);
    assert_eq!(mesh.vertex_count(), 20);
    let topo = build(&mesh).unwrap();
    assert_eq!(topo.particle_count(), 8);
    assert_eq!(topo.link_count(), 18);
    assert_eq!(topo.cell_count(), 5);
    assert!(topo.cross_layer_welds > 0);
}

#[test]
fn cross_layer_welds_raise_a_warning() {
    assert_eq!(warnings_while_building(&cube_block(Vec3::ZERO, 1.0, 0)), 1);
    assert_eq!(warnings_while_building(&tetrahedron(Vec3::ZERO, 1.0, 0)), 0);
}

#[test]
fn cube_column_counts() {
    let topo = build(&cube_column(2, 1.0)).unwrap();
    assert_eq!(topo.particle_count(), 12);
    assert_eq!(topo.link_count(), 32);
    assert_eq!(topo.cell_count(), 10);
}

#[test]
fn cell_count_is_one_past_max_layer() {
    let mesh = cube_column(3, 0.5);
    let topo = build(&mesh).unwrap();
    assert_eq!(topo.cell_count(), mesh.max_layer().unwrap() as usize + 1);
    for (i, cell) in topo.cells.iter().enumerate() {
        assert_eq!(cell.layer, LayerId(i as u32));
    }
}

#[test]
fn links_are_sorted_unique_and_distinct() {
    let topo = build(&cube_column(3, 1.0)).unwrap();
    for link in &topo.links {
        assert!(link.m0 < link.m1);
    }
    for pair in topo.links.windows(2) {
        assert!(pair[0].key() < pair[1].key());
    }
}

#[test]
fn rest_lengths_match_relaxed_positions() {
    let topo = build(&cube_block(Vec3::ZERO, 2.0, 0)).unwrap();
    for link in &topo.links {
        let d = (topo.particles[link.m0.index()] - topo.particles[link.m1.index()]).length();
        assert!((d - link.rest_length).abs() < 1e-6);
        assert!(link.rest_length >= 2.0 - 1e-6);
    }
    let floor = 0.1 * 2.0;
    assert!((topo.smallest_length2 - floor * floor).abs() < 1e-6);
}

#[test]
fn cells_reference_distinct_particles() {
    let topo = build(&cube_column(2, 1.0)).unwrap();
    for cell in &topo.cells {
        for i in 0..4 {
            assert!(cell.indices[i].index() < topo.particle_count());
            for j in (i + 1)..4 {
                assert_ne!(cell.indices[i], cell.indices[j]);
            }
        }
    }
}

#[test]
fn rest_volume_non_negative_for_either_winding() {
    let outward = build(&tetrahedron(Vec3::ZERO, 1.0, 0)).unwrap();
    let inward = build(&inward_tetrahedron()).unwrap();
    for topo in [&outward, &inward] {
        let cell = topo.cells[0];
        assert!((cell.rest_volume - 1.0).abs() < 1e-6);
        let p = cell.indices.map(|i| topo.particles[i.index()]);
        assert!(signed_volume(p) >= 0.0);
    }
}

#[test]
fn central_cube_tet_has_double_volume() {
    let topo = build(&cube_block(Vec3::ZERO, 1.0, 0)).unwrap();
    assert!((topo.cells[4].rest_volume - 2.0).abs() < 1e-5);
    let total: f32 = topo.cells.iter().map(|c| c.rest_volume).sum();
    assert!((total - 6.0).abs() < 1e-5);
}

#[test]
fn config_round_trips_through_toml() {
    let config = TopologyConfig {
        weld_tolerance: 1e-4,
        ..Default::default()
    };
    let text = toml::to_string(&config).unwrap();
    let recovered: TopologyConfig = toml::from_str(&text).unwrap();
    assert_eq!(recovered.weld_tolerance, 1e-4);
    assert_eq!(recovered.max_fan_stack, 32);
}

// ─── Topology Error Tests ─────────────────────────────────────

#[test]
fn two_cells_in_one_layer_is_malformed() {
    let mut mesh = tetrahedron(Vec3::ZERO, 1.0, 0);
    push_tetrahedron(
        &mut mesh,
        [Vec3::new(5.0, 0.0, 0.0), Vec3::new(6.0, 0.0, 0.0), Vec3::new(5.0, 1.0, 0.0), Vec3::new(5.0, 0.0, 1.0)],
        0,
    );
    assert!(matches!(build(&mesh), Err(MorphoError::MalformedTopology(_))));
}

#[test]
fn missing_layer_is_malformed() {
    let mesh = tetrahedron(Vec3::ZERO, 1.0, 1);
    assert!(matches!(build(&mesh), Err(MorphoError::MalformedTopology(_))));
}

#[test]
fn cross_layer_fan_is_malformed() {
    let mut mesh = tetrahedron(Vec3::ZERO, 1.0, 0);
    mesh.layers[3] = 1;
    assert!(matches!(build(&mesh), Err(MorphoError::MalformedTopology(_))));
}

#[test]
fn open_surface_is_malformed() {
    let mesh = TriangleMesh::from_interleaved(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        &[0, 1, 2],
        &[0; 3],
    )
    .unwrap();
    assert!(matches!(build(&mesh), Err(MorphoError::MalformedTopology(_))));
}

/// Closed triangular bipyramid in layer 0 with apexes `north` and `south`.
fn bipyramid(north: Vec3, south: Vec3) -> TriangleMesh {
    let positions = [
        1.0, 0.0, 0.0, //
        -0.5, 0.0, 0.866, //
        -0.5, 0.0, -0.866, //
        north.x, north.y, north.z, //
        south.x, south.y, south.z,
    ];
    let indices = [
        0, 1, 3, 1, 2, 3, 2, 0, 3, // upper fan
        1, 0, 4, 2, 1, 4, 0, 2, 4, // lower fan
    ];
    TriangleMesh::from_interleaved(&positions, &indices, &[0; 5]).unwrap()
}

#[test]
fn five_vertex_shell_is_malformed() {
    let mesh = bipyramid(Vec3::Y, Vec3::NEG_Y);
    let err = build(&mesh).unwrap_err();
    assert!(matches!(err, MorphoError::MalformedTopology(_)));
    assert!(err.to_string().contains("more than 4"), "{err}");
}

#[test]
fn welded_repeat_within_fan_is_malformed() {
    // Both apexes sit on one point, so the shell welds to 4 particles
    // but its fan reaches the apex particle twice.
    let mesh = bipyramid(Vec3::Y, Vec3::Y);
    let err = build(&mesh).unwrap_err();
    assert!(matches!(err, MorphoError::MalformedTopology(_)));
    assert!(err.to_string().contains("twice"), "{err}");
}

#[test]
fn shallow_stack_is_malformed() {
    let he = HalfEdgeMesh::from_triangle_mesh(&tetrahedron(Vec3::ZERO, 1.0, 0)).unwrap();
    let config = TopologyConfig {
        max_fan_stack: 2,
        ..Default::default()
    };
    let err = SoftTopology::build(&he, &config).unwrap_err();
    assert!(err.to_string().contains("traversal stack"));
}

#[test]
fn flat_cell_is_degenerate() {
    let mut mesh = TriangleMesh::default();
    push_tetrahedron(
        &mut mesh,
        [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)],
        0,
    );
    assert!(matches!(build(&mesh), Err(MorphoError::DegenerateGeometry(_))));
}

#[test]
fn collapsed_edge_is_degenerate() {
    let mut mesh = TriangleMesh::default();
    push_tetrahedron(
        &mut mesh,
        [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1e-6, 0.0, 0.0)],
        0,
    );
    assert!(matches!(build(&mesh), Err(MorphoError::DegenerateGeometry(_))));
}

#[test]
fn invalid_config_is_rejected() {
    let he = HalfEdgeMesh::from_triangle_mesh(&tetrahedron(Vec3::ZERO, 1.0, 0)).unwrap();
    let config = TopologyConfig {
        weld_tolerance: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        SoftTopology::build(&he, &config),
        Err(MorphoError::InvalidConfig(_))
    ));
}
