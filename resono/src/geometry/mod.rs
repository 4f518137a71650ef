//! Scene geometry records.
//!
//! The scene stores its geometry in flat arenas of [`Vertex`], [`Edge`] and
//! [`Triangle`] and refers to records by `u32` index. The records are laid out
//! for bulk processing: `#[repr(C)]`, 16 byte aligned and sized in multiples
//! of 16.

pub mod material;
pub mod mesh;

pub use material::Material;
pub use mesh::{Mesh, MeshTriangle};

use crate::math::Vec3;

/// Marks a missing triangle on a border edge.
pub const NO_TRIANGLE: u32 = u32::MAX;

#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C, align(16))]
pub struct Vertex {
    pub position: Vec3,
    /// Index of this vertex in the scene arena.
    pub index: u32,
}

/// An undirected edge shared by at most two triangles on a manifold mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C, align(16))]
pub struct Edge {
    /// Vertex indices, lower index first.
    pub vertices: [u32; 2],
    /// Owning triangles, [`NO_TRIANGLE`] where there is none.
    pub triangles: [u32; 2],
}

impl Edge {
    pub fn new(v0: u32, v1: u32) -> Self {
        Self {
            vertices: [v0.min(v1), v0.max(v1)],
            triangles: [NO_TRIANGLE; 2],
        }
    }

    /// Returns the number of triangles attached to this edge, saturating at 2.
    pub fn triangle_count(&self) -> usize {
        self.triangles.iter().filter(|&&t| t != NO_TRIANGLE).count()
    }
}

/// A scene triangle with its supporting plane `normal · p + offset = 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C, align(16))]
pub struct Triangle {
    pub vertices: [u32; 3],
    pub edges: [u32; 3],
    /// Unit normal following the counter clockwise winding of `vertices`.
    pub normal: Vec3,
    pub offset: f32,
    /// Index of the material in the scene arena.
    pub material: u32,
    /// Fraction of the incident energy that is reflected.
    pub reflection: f32,
}

impl Triangle {
    /// Returns the signed distance from `p` to the plane of this `Triangle`.
    pub fn distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.offset
    }
}

const _: () = assert!(std::mem::size_of::<Vertex>() % 16 == 0);
const _: () = assert!(std::mem::size_of::<Edge>() % 16 == 0);
const _: () = assert!(std::mem::size_of::<Triangle>() % 16 == 0);
