use menger_fractal::{CancelToken, Cube, MengerError, generate};
use menger_geom::Vec3;
use menger_mesh::{SpongeBuilder, assemble, build_menger_sponge, deduplicate, default_tolerance};

fn unit_half() -> Vec3 {
    Vec3::splat(0.5)
}

#[test]
fn assemble_counts_before_dedup() {
    for n in 0..=2 {
        let cubes = generate(Cube::new(Vec3::ZERO, unit_half()), n).unwrap();
        let mesh = assemble(&cubes).unwrap();
        assert_eq!(mesh.vertex_count(), 8 * cubes.len());
        assert_eq!(mesh.face_count(), 6 * cubes.len());
        assert!(mesh.validate().is_ok());
    }
}

#[test]
fn assemble_empty_is_empty() {
    let mesh = assemble(&[]).unwrap();
    assert!(mesh.is_empty());
}

#[test]
fn single_cube_has_nothing_to_merge() {
    let mesh = build_menger_sponge(Vec3::ZERO, unit_half(), 0).unwrap();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 6);
}

#[test]
fn one_iteration_shares_corners() {
    let cubes = generate(Cube::new(Vec3::ZERO, unit_half()), 1).unwrap();
    assert_eq!(cubes.len(), 20);
    let mesh = deduplicate(&assemble(&cubes).unwrap(), default_tolerance(&cubes)).unwrap();
    assert!(mesh.vertex_count() < 160);
    // 4x4x4 lattice, every point touched by a surviving cube
    assert_eq!(mesh.vertex_count(), 64);
    assert_eq!(mesh.face_count(), 120);
}

#[test]
fn deeper_sponges_weld_to_lattice_counts() {
    let two = build_menger_sponge(Vec3::ZERO, unit_half(), 2).unwrap();
    assert_eq!(two.vertex_count(), 896);
    assert_eq!(two.face_count(), 2400);

    let three = build_menger_sponge(Vec3::ZERO, unit_half(), 3).unwrap();
    assert_eq!(three.vertex_count(), 15_616);
    assert_eq!(three.face_count(), 48_000);
}

// Shared corners are reached by different sums; far from the origin their
// copies differ by several ulps and must still weld.
#[test]
fn sponges_far_from_origin_weld_like_centered_ones() {
    let three = build_menger_sponge(Vec3::splat(1000.0), unit_half(), 3).unwrap();
    assert_eq!(three.vertex_count(), 15_616);
    assert_eq!(three.face_count(), 48_000);

    let two = build_menger_sponge(Vec3::splat(10_000.0), unit_half(), 2).unwrap();
    assert_eq!(two.vertex_count(), 896);

    let offset = build_menger_sponge(Vec3::new(-250.0, 3.0, 4096.0), unit_half(), 2).unwrap();
    assert_eq!(offset.vertex_count(), 896);
}

#[test]
fn welded_vertices_are_all_referenced_and_apart() {
    let sponge = SpongeBuilder::new(Vec3::new(3.0, -2.0, 1.0), Vec3::splat(2.0))
        .iterations(2)
        .build()
        .unwrap();
    let mesh = &sponge.mesh;
    assert!(mesh.vertex_valence().iter().all(|&u| u >= 1));
    for (i, a) in mesh.vertices.iter().enumerate() {
        for b in &mesh.vertices[i + 1..] {
            assert!(a.distance(*b) > sponge.tolerance);
        }
    }
    assert_eq!(sponge.cubes, 400);
    assert_eq!(sponge.raw_vertices, 3200);
    assert_eq!(sponge.merged_vertices(), 3200 - 896);
}

#[test]
fn dedup_twice_is_a_no_op() {
    let cubes = generate(Cube::new(Vec3::ZERO, unit_half()), 2).unwrap();
    let tol = default_tolerance(&cubes);
    let once = deduplicate(&assemble(&cubes).unwrap(), tol).unwrap();
    let twice = deduplicate(&once, tol).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn dedup_preserves_face_order_and_winding() {
    let cubes = generate(Cube::new(Vec3::ZERO, unit_half()), 1).unwrap();
    let raw = assemble(&cubes).unwrap();
    let welded = deduplicate(&raw, default_tolerance(&cubes)).unwrap();
    for (before, after) in raw.faces.iter().zip(&welded.faces) {
        for k in 0..4 {
            let p = raw.vertices[before[k] as usize];
            let q = welded.vertices[after[k] as usize];
            assert!(p.distance(q) <= 1e-5);
        }
    }
}

#[test]
fn builder_without_weld_returns_raw_mesh() {
    let sponge = SpongeBuilder::new(Vec3::ZERO, unit_half())
        .iterations(1)
        .weld(false)
        .build()
        .unwrap();
    assert_eq!(sponge.mesh.vertex_count(), 160);
    assert_eq!(sponge.merged_vertices(), 0);
}

#[test]
fn builder_surfaces_core_errors() {
    let neg = build_menger_sponge(Vec3::ZERO, unit_half(), -1).unwrap_err();
    assert!(matches!(neg, MengerError::InvalidArgument(_)));

    let flat = build_menger_sponge(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.5), 1).unwrap_err();
    assert!(matches!(flat, MengerError::InvalidArgument(_)));

    let capped = SpongeBuilder::new(Vec3::ZERO, unit_half())
        .iterations(3)
        .max_cubes(Some(1000))
        .build()
        .unwrap_err();
    assert!(matches!(capped, MengerError::ResourceLimitExceeded { .. }));

    let token = CancelToken::new();
    token.cancel();
    let cancelled = SpongeBuilder::new(Vec3::ZERO, unit_half())
        .iterations(2)
        .cancel_token(token)
        .build()
        .unwrap_err();
    assert_eq!(cancelled, MengerError::Cancelled { completed_rounds: 0 });

    let bad_tol = SpongeBuilder::new(Vec3::ZERO, unit_half())
        .tolerance(Some(-1.0))
        .build()
        .unwrap_err();
    assert!(matches!(bad_tol, MengerError::InvalidArgument(_)));
}
