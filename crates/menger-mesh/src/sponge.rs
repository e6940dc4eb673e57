use menger_fractal::{CancelToken, Cube, Generator, MengerError};
use menger_geom::Vec3;

use crate::assemble::assemble;
use crate::mesh::Mesh;
use crate::weld::{deduplicate, default_tolerance};

/// Generates, assembles and welds a sponge with the default tolerance.
pub fn build_menger_sponge(
    center: Vec3,
    half_extent: Vec3,
    iterations: i32,
) -> Result<Mesh, MengerError> {
    SpongeBuilder::new(center, half_extent)
        .iterations(iterations)
        .build()
        .map(|s| s.mesh)
}

/// Result of a full sponge build, with the counts seen along the way.
#[derive(Clone, Debug)]
pub struct Sponge {
    pub cubes: usize,
    pub raw_vertices: usize,
    pub tolerance: f32,
    pub mesh: Mesh,
}

impl Sponge {
    /// Corners removed by welding.
    pub fn merged_vertices(&self) -> usize {
        self.raw_vertices - self.mesh.vertex_count()
    }
}

#[derive(Clone, Debug)]
pub struct SpongeBuilder {
    center: Vec3,
    half_extent: Vec3,
    iterations: i32,
    tolerance: Option<f32>,
    weld: bool,
    generator: Generator,
}

impl SpongeBuilder {
    pub fn new(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            center,
            half_extent,
            iterations: 1,
            tolerance: None,
            weld: true,
            generator: Generator::default(),
        }
    }

    pub fn iterations(mut self, iterations: i32) -> Self {
        self.iterations = iterations;
        self
    }

    /// `None` derives the tolerance from the leaf size.
    pub fn tolerance(mut self, tolerance: Option<f32>) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Skip welding and return the assembled mesh as is.
    pub fn weld(mut self, weld: bool) -> Self {
        self.weld = weld;
        self
    }

    pub fn max_cubes(mut self, limit: Option<u64>) -> Self {
        self.generator = self.generator.max_cubes(limit);
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.generator = self.generator.cancel_token(token);
        self
    }

    pub fn build(&self) -> Result<Sponge, MengerError> {
        let seed = Cube::new(self.center, self.half_extent);
        let cubes = self.generator.generate(seed, self.iterations)?;
        let tolerance = self.tolerance.unwrap_or_else(|| default_tolerance(&cubes));
        let raw = assemble(&cubes)?;
        let raw_vertices = raw.vertex_count();
        let mesh = if self.weld {
            deduplicate(&raw, tolerance)?
        } else {
            raw
        };
        log::debug!(
            "sponge n={} cubes={} raw_verts={} verts={} faces={}",
            self.iterations,
            cubes.len(),
            raw_vertices,
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(Sponge {
            cubes: cubes.len(),
            raw_vertices,
            tolerance,
            mesh,
        })
    }
}
