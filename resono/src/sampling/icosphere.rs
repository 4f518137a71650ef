use std::collections::HashMap;

use crate::math::Vec3;

/// Subdivided unit icosahedron.
pub struct Icosphere {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl Icosphere {
    /// Creates an `Icosphere` with `level` subdivisions, `20 * 4^level` faces.
    pub fn new(level: u32) -> Self {
        let t = (1.0 + 5.0f32.sqrt()) / 2.0;
        let vertices = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .iter()
        .map(|v| v.normalize())
        .collect();
        let faces = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        let mut ret = Self { vertices, faces };
        for _ in 0..level {
            ret.subdivide();
        }
        ret
    }

    // Splits every face into four, pushing the new vertices onto the sphere
    fn subdivide(&mut self) {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut faces = Vec::with_capacity(self.faces.len() * 4);
        for [a, b, c] in std::mem::take(&mut self.faces) {
            let ab = self.midpoint(&mut midpoints, a, b);
            let bc = self.midpoint(&mut midpoints, b, c);
            let ca = self.midpoint(&mut midpoints, c, a);
            faces.push([a, ab, ca]);
            faces.push([b, bc, ab]);
            faces.push([c, ca, bc]);
            faces.push([ab, bc, ca]);
        }
        self.faces = faces;
    }

    fn midpoint(&mut self, cache: &mut HashMap<(u32, u32), u32>, a: u32, b: u32) -> u32 {
        let key = (a.min(b), a.max(b));
        if let Some(&i) = cache.get(&key) {
            return i;
        }
        let p = (self.vertices[a as usize] + self.vertices[b as usize]).normalize();
        let i = self.vertices.len() as u32;
        self.vertices.push(p);
        cache.insert(key, i);
        i
    }

    /// Returns the unit directions through the face centroids.
    pub fn directions(&self) -> Vec<Vec3> {
        self.faces
            .iter()
            .map(|f| {
                let [p0, p1, p2] = f.map(|v| self.vertices[v as usize]);
                (p0 + p1 + p2).normalize()
            })
            .collect()
    }
}
