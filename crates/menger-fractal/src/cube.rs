use menger_geom::{Aabb, Vec3};

/// Quads of every cube as indices into its own 8 corners, in
/// front/back/top/bottom/right/left order.
pub const CUBE_FACES: [[u32; 4]; 6] = [
    [0, 1, 3, 2],
    [4, 6, 7, 5],
    [0, 2, 6, 4],
    [1, 5, 7, 3],
    [0, 4, 5, 1],
    [2, 3, 7, 6],
];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CubeFace {
    Front = 0,
    Back = 1,
    Top = 2,
    Bottom = 3,
    Right = 4,
    Left = 5,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Back,
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Right,
        CubeFace::Left,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `CubeFace`.
    #[inline]
    pub fn from_index(i: usize) -> Option<CubeFace> {
        CubeFace::ALL.get(i).copied()
    }

    /// Local corner indices of this face's quad.
    #[inline]
    pub fn indices(self) -> [u32; 4] {
        CUBE_FACES[self.index()]
    }
}

/// An axis-aligned cube, stored as center plus per-axis half extent.
///
/// Corners are computed once at construction. Corner `i*4 + j*2 + k` sits at
/// `center - half_extent + (i, j, k) * half_extent * 2`, so bit 2 selects +x,
/// bit 1 selects +y and bit 0 selects +z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cube {
    center: Vec3,
    half_extent: Vec3,
    vertices: [Vec3; 8],
}

impl Cube {
    pub fn new(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            center,
            half_extent,
            vertices: corners(center, half_extent),
        }
    }

    /// Uniform cube with the same half size on every axis.
    pub fn uniform(center: Vec3, half_size: f32) -> Self {
        Self::new(center, Vec3::splat(half_size))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn half_extent(&self) -> Vec3 {
        self.half_extent
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3; 8] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &'static [[u32; 4]; 6] {
        &CUBE_FACES
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extent(self.center, self.half_extent)
    }

    /// Length of the shortest edge.
    #[inline]
    pub fn edge_length_min(&self) -> f32 {
        self.half_extent.min_element() * 2.0
    }
}

fn corners(center: Vec3, half_extent: Vec3) -> [Vec3; 8] {
    let origin = center - half_extent;
    let full = half_extent * 2.0;
    let mut out = [Vec3::ZERO; 8];
    for i in 0..2u8 {
        for j in 0..2u8 {
            for k in 0..2u8 {
                let bits = Vec3::new(f32::from(i), f32::from(j), f32::from(k));
                out[usize::from(i * 4 + j * 2 + k)] = origin + bits * full;
            }
        }
    }
    out
}
