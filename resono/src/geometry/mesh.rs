use super::Material;
use crate::math::Vec3;

/// Indices of a mesh triangle and its material.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshTriangle {
    /// Indices into [`Mesh::positions`], counter clockwise.
    pub vertices: [usize; 3],
    /// Index into [`Mesh::materials`].
    pub material: usize,
}

/// Caller-side triangle mesh that gets attached to a [`crate::Scene`].
///
/// Nothing is validated here, [`crate::Scene::attach`] checks the indices,
/// positions and materials.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub materials: Vec<Material>,
    pub triangles: Vec<MeshTriangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn add_position(&mut self, p: Vec3) -> usize {
        self.positions.push(p);
        self.positions.len() - 1
    }

    /// Appends a material and returns its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_triangle(&mut self, vertices: [usize; 3], material: usize) {
        self.triangles.push(MeshTriangle { vertices, material });
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Creates a closed box room spanning `min` to `max` with every face
    /// winding towards the inside.
    pub fn cuboid(min: Vec3, max: Vec3, material: Material) -> Self {
        let mut ret = Self::new();
        let m = ret.add_material(material);
        // Corner i has x from bit 0, y from bit 1 and z from bit 2
        for i in 0..8 {
            ret.add_position(Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            ));
        }
        // Quads wound counter clockwise when seen from the outside
        const QUADS: [[usize; 4]; 6] = [
            [0, 4, 6, 2],
            [1, 3, 7, 5],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 2, 3, 1],
            [4, 5, 7, 6],
        ];
        for [a, b, c, d] in QUADS {
            ret.add_triangle([a, d, c], m);
            ret.add_triangle([a, c, b], m);
        }
        ret
    }
}
