//! Menger sponge subdivision: cubes in, leaf cubes out (no meshing, no I/O).
#![forbid(unsafe_code)]

mod cancel;
mod cube;
mod error;
mod subdivide;

pub use cancel::CancelToken;
pub use cube::{CUBE_FACES, Cube, CubeFace};
pub use error::MengerError;
pub use subdivide::{
    CHILDREN_PER_CUBE, DEFAULT_MAX_CUBES, DEFAULT_PARALLEL_THRESHOLD, Generator, RoundHook,
    generate, projected_cube_count, projected_peak_bytes, subdivide,
};

pub use menger_geom::{Aabb, Vec3};
