use menger_fractal::MengerError;
use menger_geom::{Aabb, Vec3};

/// Four indices into [`Mesh::vertices`]; the order carries the winding.
pub type Quad = [u32; 4];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Quad>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.vertices.is_empty()
    }

    /// Fails with `InvariantViolation` on the first face index past the vertex list.
    pub fn validate(&self) -> Result<(), MengerError> {
        let n = self.vertices.len();
        for (fi, quad) in self.faces.iter().enumerate() {
            if let Some(&bad) = quad.iter().find(|&&i| i as usize >= n) {
                return Err(MengerError::InvariantViolation(format!(
                    "face {fi} references vertex {bad} but the mesh has {n} vertices"
                )));
            }
        }
        Ok(())
    }

    /// Bounding box of all vertices, `None` for a vertex-less mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        let (first, rest) = self.vertices.split_first()?;
        let mut bb = Aabb::new(*first, *first);
        for &p in rest {
            bb.include(p);
        }
        Some(bb)
    }

    /// Splits each quad `(a, b, c, d)` into `(a, b, c)` and `(a, c, d)`.
    pub fn triangle_indices(&self) -> Vec<u32> {
        let mut idx = Vec::with_capacity(self.faces.len() * 6);
        for &[a, b, c, d] in &self.faces {
            idx.extend_from_slice(&[a, b, c, a, c, d]);
        }
        idx
    }

    /// Number of faces that reference each vertex.
    pub fn vertex_valence(&self) -> Vec<u32> {
        let mut uses = vec![0u32; self.vertices.len()];
        for quad in &self.faces {
            for &i in quad {
                if let Some(u) = uses.get_mut(i as usize) {
                    *u += 1;
                }
            }
        }
        uses
    }
}
