use std::time::Instant;

use menger_fractal::{Cube, MengerError};

use crate::mesh::Mesh;

/// Indices are `u32`, so one mesh holds at most `2^32` vertices.
pub const MAX_MESH_VERTICES: u64 = u32::MAX as u64 + 1;

impl Mesh {
    /// Appends a cube's 8 corners and its 6 quads, offset to the new corners.
    ///
    /// The caller guarantees the vertex count stays within [`MAX_MESH_VERTICES`].
    #[inline]
    pub(crate) fn push_cube(&mut self, cube: &Cube) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(cube.vertices());
        self.faces
            .extend(cube.faces().iter().map(|quad| quad.map(|i| base + i)));
    }
}

/// Concatenates every cube into one mesh without merging anything:
/// `8 * cubes.len()` vertices and `6 * cubes.len()` quads, in cube order.
pub fn assemble(cubes: &[Cube]) -> Result<Mesh, MengerError> {
    let vertex_total = cubes.len() as u64 * 8;
    if vertex_total > MAX_MESH_VERTICES {
        return Err(MengerError::ResourceLimitExceeded {
            what: "vertices",
            projected: vertex_total,
            limit: MAX_MESH_VERTICES,
        });
    }
    let t0 = Instant::now();
    let mut mesh = Mesh::with_capacity(cubes.len() * 8, cubes.len() * 6);
    for cube in cubes {
        mesh.push_cube(cube);
    }
    debug_assert!(mesh.validate().is_ok());
    log::info!(target: "perf", "ms={} mesh_assemble cubes={} verts={} faces={}", t0.elapsed().as_millis(), cubes.len(), mesh.vertex_count(), mesh.face_count());
    Ok(mesh)
}
