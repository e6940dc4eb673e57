//! Shared-vertex quad meshes built from axis-aligned cubes.
//!
//! [`assemble`] concatenates every cube's 8 corners and 6 quads, and
//! [`deduplicate`] welds coincident corners through a hash grid. Interior
//! faces between touching cubes are kept; only vertices are merged.
#![forbid(unsafe_code)]

mod assemble;
mod mesh;
mod sponge;
mod weld;

pub use assemble::{MAX_MESH_VERTICES, assemble};
pub use mesh::{Mesh, Quad};
pub use sponge::{Sponge, SpongeBuilder, build_menger_sponge};
pub use weld::{
    DEFAULT_TOLERANCE_FRACTION, DEFAULT_TOLERANCE_ULPS, MAX_TOLERANCE_FRACTION, deduplicate,
    default_tolerance,
};

pub use menger_fractal::MengerError;

#[cfg(test)]
mod tests;
