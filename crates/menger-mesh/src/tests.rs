use super::*;
use menger_fractal::{CUBE_FACES, Cube};
use menger_geom::Vec3;

fn quad_mesh(vertices: Vec<Vec3>, faces: Vec<Quad>) -> Mesh {
    Mesh { vertices, faces }
}

#[test]
fn push_cube_offsets_by_existing_vertices() {
    let mut m = Mesh::new();
    m.push_cube(&Cube::uniform(Vec3::ZERO, 1.0));
    m.push_cube(&Cube::uniform(Vec3::new(2.0, 0.0, 0.0), 1.0));
    assert_eq!(m.vertex_count(), 16);
    assert_eq!(m.face_count(), 12);
    assert_eq!(m.faces[0], CUBE_FACES[0]);
    assert_eq!(m.faces[6], CUBE_FACES[0].map(|i| i + 8));
    assert_eq!(m.faces[11], [10, 11, 15, 14]);
}

#[test]
fn validate_reports_out_of_range_index() {
    let m = quad_mesh(vec![Vec3::ZERO; 3], vec![[0, 1, 2, 3]]);
    let err = m.validate().unwrap_err();
    assert!(matches!(err, MengerError::InvariantViolation(_)), "{err}");
    assert!(quad_mesh(vec![Vec3::ZERO; 4], vec![[0, 1, 2, 3]]).validate().is_ok());
}

#[test]
fn triangles_keep_quad_winding() {
    let m = quad_mesh(vec![Vec3::ZERO; 4], vec![[0, 1, 2, 3]]);
    assert_eq!(m.triangle_indices(), vec![0, 1, 2, 0, 2, 3]);
}

#[test]
fn bounds_and_valence() {
    assert_eq!(Mesh::new().bounds(), None);
    let m = assemble(&[Cube::uniform(Vec3::new(1.0, 1.0, 1.0), 0.5)]).unwrap();
    let bb = m.bounds().unwrap();
    assert_eq!(bb.min, Vec3::splat(0.5));
    assert_eq!(bb.max, Vec3::splat(1.5));
    assert_eq!(m.vertex_valence(), vec![3; 8]);
}

#[test]
fn dedup_merges_only_within_tolerance() {
    let m = quad_mesh(
        vec![
            Vec3::ZERO,
            Vec3::new(0.05, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 2, 3, 4], [1, 2, 3, 4]],
    );
    let loose = deduplicate(&m, 0.1).unwrap();
    assert_eq!(loose.vertex_count(), 4);
    assert_eq!(loose.faces, vec![[0, 1, 2, 3], [0, 1, 2, 3]]);

    let tight = deduplicate(&m, 0.01).unwrap();
    assert_eq!(tight.vertex_count(), 5);
    assert_eq!(tight.faces, m.faces);
}

#[test]
fn dedup_boundary_distance_is_inclusive() {
    let m = quad_mesh(
        vec![Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), Vec3::ONE, Vec3::splat(2.0)],
        vec![[0, 1, 2, 3]],
    );
    let out = deduplicate(&m, 0.5).unwrap();
    assert_eq!(out.vertex_count(), 3);
    assert_eq!(out.faces, vec![[0, 0, 1, 2]]);
}

#[test]
fn dedup_keeps_first_seen_position() {
    let m = quad_mesh(
        vec![Vec3::new(0.01, 0.0, 0.0), Vec3::ZERO, Vec3::ONE, Vec3::splat(2.0)],
        vec![[1, 0, 2, 3]],
    );
    let out = deduplicate(&m, 0.05).unwrap();
    assert_eq!(out.vertices[0], Vec3::new(0.01, 0.0, 0.0));
    assert_eq!(out.faces, vec![[0, 0, 1, 2]]);
}

#[test]
fn dedup_drops_unreferenced_vertices() {
    let m = quad_mesh(
        vec![Vec3::splat(9.0), Vec3::ZERO, Vec3::ONE, Vec3::splat(2.0), Vec3::splat(3.0)],
        vec![[1, 2, 3, 4]],
    );
    let out = deduplicate(&m, 0.0).unwrap();
    assert_eq!(out.vertices, vec![Vec3::ZERO, Vec3::ONE, Vec3::splat(2.0), Vec3::splat(3.0)]);
    assert_eq!(out.faces, vec![[0, 1, 2, 3]]);
}

#[test]
fn zero_tolerance_merges_exact_copies_and_signed_zero() {
    let m = quad_mesh(
        vec![Vec3::ZERO, Vec3::new(-0.0, 0.0, -0.0), Vec3::ONE, Vec3::new(1.0, 1.0, 1.000_001)],
        vec![[0, 1, 2, 3]],
    );
    let out = deduplicate(&m, 0.0).unwrap();
    assert_eq!(out.vertex_count(), 3);
    assert_eq!(out.faces, vec![[0, 0, 1, 2]]);
}

#[test]
fn dedup_rejects_bad_tolerance_and_bad_indices() {
    let m = quad_mesh(vec![Vec3::ZERO; 4], vec![[0, 1, 2, 3]]);
    for tol in [-1.0, f32::NAN, f32::INFINITY] {
        assert!(matches!(deduplicate(&m, tol), Err(MengerError::InvalidArgument(_))));
    }
    let broken = quad_mesh(vec![Vec3::ZERO; 2], vec![[0, 1, 2, 3]]);
    assert!(matches!(
        deduplicate(&broken, 0.1),
        Err(MengerError::InvariantViolation(_))
    ));
}

#[test]
fn default_tolerance_scales_with_smallest_edge() {
    assert_eq!(default_tolerance(&[]), 0.0);
    let cubes = [
        Cube::uniform(Vec3::ZERO, 1.0),
        Cube::new(Vec3::ONE, Vec3::new(1.0, 0.25, 1.0)),
    ];
    assert!((default_tolerance(&cubes) - 0.5 * DEFAULT_TOLERANCE_FRACTION).abs() < 1e-9);
}

#[test]
fn default_tolerance_grows_with_distance_from_origin() {
    let near = [Cube::uniform(Vec3::ZERO, 0.5)];
    let far = [Cube::uniform(Vec3::splat(1000.0), 0.5)];
    assert!(default_tolerance(&far) > default_tolerance(&near));
    let floor = 1000.5 * f32::EPSILON * DEFAULT_TOLERANCE_ULPS;
    assert!((default_tolerance(&far) - floor).abs() < 1e-6);
}

#[test]
fn default_tolerance_stays_below_a_quarter_edge() {
    let tiny_far = [Cube::uniform(Vec3::splat(1.0e6), 1.0e-3)];
    let tol = default_tolerance(&tiny_far);
    assert!((tol - 2.0e-3 * MAX_TOLERANCE_FRACTION).abs() < 1e-9);
}
