//! Integration tests for morpho-math.

use morpho_math::tetra::{signed_volume, volume_gradient};
use morpho_math::Vec3;

fn corner_tet() -> [Vec3; 4] {
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    ]
}

// ─── Signed Volume ────────────────────────────────────────────

#[test]
fn swap_flips_sign() {
    let p = corner_tet();
    let swapped = [p[1], p[0], p[2], p[3]];
    let a = signed_volume(p);
    let b = signed_volume(swapped);
    assert!((a + b).abs() < 1e-6);
    assert!(a.abs() > 0.5);
}

#[test]
fn translation_invariant() {
    let p = corner_tet();
    let offset = Vec3::new(3.0, -2.0, 7.5);
    let moved = p.map(|q| q + offset);
    assert!((signed_volume(p) - signed_volume(moved)).abs() < 1e-4);
}

#[test]
fn flat_tet_has_zero_volume() {
    let p = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)];
    assert_eq!(signed_volume(p), 0.0);
}

#[test]
fn scales_with_cube_of_size() {
    let p = corner_tet();
    let scaled = p.map(|q| q * 2.0);
    assert!((signed_volume(scaled) - 8.0 * signed_volume(p)).abs() < 1e-4);
}

// ─── Gradient ─────────────────────────────────────────────────

#[test]
fn gradient_sums_to_zero() {
    let p = [
        Vec3::new(0.1, 0.0, 0.2),
        Vec3::new(1.3, 0.1, 0.0),
        Vec3::new(0.0, 0.9, 0.3),
        Vec3::new(0.2, 0.1, 1.1),
    ];
    let g = volume_gradient(p);
    let sum: Vec3 = g.gradient.iter().copied().sum();
    assert!(sum.length() < 1e-5, "gradient sum = {sum:?}");
}

#[test]
fn gradient_matches_finite_difference() {
    let p = [
        Vec3::new(0.1, 0.0, 0.2),
        Vec3::new(1.3, 0.1, 0.0),
        Vec3::new(0.0, 0.9, 0.3),
        Vec3::new(0.2, 0.1, 1.1),
    ];
    let g = volume_gradient(p);
    let h = 1e-3;
    for i in 0..4 {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let mut plus = p;
            let mut minus = p;
            plus[i] += axis * h;
            minus[i] -= axis * h;
            let fd = (signed_volume(plus) - signed_volume(minus)) / (2.0 * h);
            let analytic = g.gradient[i].dot(axis);
            assert!(
                (fd - analytic).abs() < 1e-2,
                "point {i}, axis {axis:?}: fd={fd}, analytic={analytic}"
            );
        }
    }
}
