use std::time::Instant;

use hashbrown::HashMap;
use menger_fractal::{Cube, MengerError};
use menger_geom::Vec3;

use crate::assemble::MAX_MESH_VERTICES;
use crate::mesh::Mesh;

/// Default weld distance as a fraction of the smallest cube edge.
pub const DEFAULT_TOLERANCE_FRACTION: f32 = 1e-3;

/// Floor on the default weld distance, in units of `f32::EPSILON` times the
/// largest absolute coordinate. Corners shared by two cubes are reached by
/// different sums and can disagree by a few ulps far from the origin.
pub const DEFAULT_TOLERANCE_ULPS: f32 = 16.0;

/// Ceiling on the default weld distance as a fraction of the smallest edge,
/// so distinct corners never fall within range of each other.
pub const MAX_TOLERANCE_FRACTION: f32 = 0.25;

/// Weld distance suited to `cubes`, or `0.0` when there are none.
///
/// [`DEFAULT_TOLERANCE_FRACTION`] of the shortest edge, raised to
/// [`DEFAULT_TOLERANCE_ULPS`] ulps of the farthest coordinate and capped at
/// [`MAX_TOLERANCE_FRACTION`] of the shortest edge.
pub fn default_tolerance(cubes: &[Cube]) -> f32 {
    let mut edge = f32::INFINITY;
    let mut reach = 0.0f32;
    for cube in cubes {
        edge = edge.min(cube.edge_length_min());
        reach = reach.max((cube.center().abs() + cube.half_extent()).max_element());
    }
    if cubes.is_empty() {
        return 0.0;
    }
    let rounding = reach * f32::EPSILON * DEFAULT_TOLERANCE_ULPS;
    (edge * DEFAULT_TOLERANCE_FRACTION)
        .max(rounding)
        .min(edge * MAX_TOLERANCE_FRACTION)
}

type CellKey = (i64, i64, i64);

/// Hash grid over retained vertices.
///
/// Cells are twice the tolerance wide, so any point within `tolerance` of a
/// query lives in the query's cell or one of its 26 neighbours. A zero
/// tolerance keys cells on the exact bit pattern instead.
struct WeldGrid {
    tolerance: f32,
    inv_cell: f64,
    exact: bool,
    cells: HashMap<CellKey, Vec<u32>>,
}

impl WeldGrid {
    fn new(tolerance: f32, expected: usize) -> Self {
        let exact = tolerance == 0.0;
        let inv_cell = if exact {
            0.0
        } else {
            1.0 / (f64::from(tolerance) * 2.0)
        };
        Self {
            tolerance,
            inv_cell,
            exact,
            cells: HashMap::with_capacity(expected),
        }
    }

    fn key(&self, p: Vec3) -> CellKey {
        if self.exact {
            // +0.0 folds -0.0 onto 0.0
            let bits = |v: f32| i64::from((v + 0.0).to_bits());
            return (bits(p.x), bits(p.y), bits(p.z));
        }
        let q = |v: f32| (f64::from(v) * self.inv_cell).floor() as i64;
        (q(p.x), q(p.y), q(p.z))
    }

    /// Earliest retained vertex within tolerance of `p`.
    fn find(&self, p: Vec3, positions: &[Vec3]) -> Option<u32> {
        let (kx, ky, kz) = self.key(p);
        let reach = if self.exact { 0 } else { 1 };
        let mut best: Option<u32> = None;
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let key = (
                        kx.saturating_add(dx),
                        ky.saturating_add(dy),
                        kz.saturating_add(dz),
                    );
                    let Some(bucket) = self.cells.get(&key) else {
                        continue;
                    };
                    for &cand in bucket {
                        if best.is_some_and(|b| b <= cand) {
                            continue;
                        }
                        if positions[cand as usize].distance(p) <= self.tolerance {
                            best = Some(cand);
                        }
                    }
                }
            }
        }
        best
    }

    fn insert(&mut self, p: Vec3, index: u32) {
        self.cells.entry(self.key(p)).or_default().push(index);
    }
}

/// Merges vertices closer than `tolerance` (inclusive) and compacts the result.
///
/// Vertices are visited in order; each one snaps to the earliest already-kept
/// vertex in range, or is kept itself. Faces keep their count, order and
/// winding and only have their indices rewritten. Kept vertices that no face
/// references are dropped. Running it again with the same tolerance is a no-op.
pub fn deduplicate(mesh: &Mesh, tolerance: f32) -> Result<Mesh, MengerError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(MengerError::InvalidArgument(format!(
            "tolerance must be finite and >= 0, got {tolerance}"
        )));
    }
    let n = mesh.vertices.len();
    if n as u64 > MAX_MESH_VERTICES {
        return Err(MengerError::ResourceLimitExceeded {
            what: "vertices",
            projected: n as u64,
            limit: MAX_MESH_VERTICES,
        });
    }
    mesh.validate()?;

    let t0 = Instant::now();
    let mut grid = WeldGrid::new(tolerance, n / 4);
    let mut rep = Vec::with_capacity(n);
    for (i, &p) in mesh.vertices.iter().enumerate() {
        let r = match grid.find(p, &mesh.vertices) {
            Some(r) => r,
            None => {
                grid.insert(p, i as u32);
                i as u32
            }
        };
        rep.push(r);
    }

    let mut used = vec![false; n];
    for quad in &mesh.faces {
        for &i in quad {
            used[rep[i as usize] as usize] = true;
        }
    }
    let mut remap = vec![u32::MAX; n];
    let mut vertices = Vec::new();
    for (i, &p) in mesh.vertices.iter().enumerate() {
        if used[i] {
            remap[i] = vertices.len() as u32;
            vertices.push(p);
        }
    }
    let faces = mesh
        .faces
        .iter()
        .map(|quad| quad.map(|i| remap[rep[i as usize] as usize]))
        .collect();

    let out = Mesh { vertices, faces };
    debug_assert!(out.validate().is_ok());
    log::info!(target: "perf", "ms={} mesh_dedup tol={} verts_in={} verts_out={} faces={}", t0.elapsed().as_millis(), tolerance, n, out.vertex_count(), out.face_count());
    Ok(out)
}
