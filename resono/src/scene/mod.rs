//! Triangulated acoustic scene.
//!
//! Meshes are attached into flat arenas, [`Scene::finalize`] builds the BVH and
//! freezes the geometry. A finalized scene is only read, so it is shared between
//! trace workers as-is.

mod bvh;
mod triangle;

pub use bvh::SplitMethod;

use std::collections::HashMap;

use bvh::BoundingVolumeHierarchy;

use crate::{
    error::{Error, Result},
    geometry::{Edge, Material, Mesh, Triangle, Vertex, NO_TRIANGLE},
    math::{self, Bounds3, Ray, Vec3},
};

/// The nearest surface hit of a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// Index into the triangle arena.
    pub triangle: u32,
    pub t: f32,
    pub point: Vec3,
}

/// Edge statistics of the attached geometry.
///
/// A closed room has no open edges. Non-manifold edges are shared by more than
/// two triangles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshReport {
    pub open_edges: usize,
    pub non_manifold_edges: usize,
}

impl MeshReport {
    pub fn is_closed(&self) -> bool {
        self.open_edges == 0 && self.non_manifold_edges == 0
    }
}

pub struct Scene {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    // Number of triangles using each edge, may exceed the two stored in `Edge`
    edge_uses: Vec<u32>,
    edge_lookup: HashMap<[u32; 2], u32>,
    triangles: Vec<Triangle>,
    materials: Vec<Material>,
    split_method: SplitMethod,
    bvh: Option<BoundingVolumeHierarchy>,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_split_method(SplitMethod::Middle)
    }

    pub fn with_split_method(split_method: SplitMethod) -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            edge_uses: Vec::new(),
            edge_lookup: HashMap::new(),
            triangles: Vec::new(),
            materials: Vec::new(),
            split_method,
            bvh: None,
        }
    }

    /// Appends `mesh` to the scene.
    ///
    /// The whole mesh is validated before anything is stored so a failed attach
    /// leaves the scene untouched.
    pub fn attach(&mut self, mesh: &Mesh) -> Result<()> {
        if self.bvh.is_some() {
            return Err(Error::InvalidArgument(
                "Scene is finalized, no more geometry can be attached".into(),
            ));
        }

        for (i, m) in mesh.materials.iter().enumerate() {
            m.validate()
                .map_err(|why| Error::Geometry(format!("Material {}: {}", i, why)))?;
        }
        for (i, p) in mesh.positions.iter().enumerate() {
            if !math::is_finite(*p) {
                return Err(Error::Geometry(format!(
                    "Vertex {} has a non-finite position {}",
                    i, p
                )));
            }
        }

        let mut planes = Vec::new();
        planes.try_reserve(mesh.triangles.len())?;
        for (i, t) in mesh.triangles.iter().enumerate() {
            let [v0, v1, v2] = t.vertices;
            if let Some(&v) = t.vertices.iter().find(|&&v| v >= mesh.positions.len()) {
                return Err(Error::Geometry(format!(
                    "Triangle {} references vertex {} but there are only {}",
                    i,
                    v,
                    mesh.positions.len()
                )));
            }
            if v0 == v1 || v1 == v2 || v2 == v0 {
                return Err(Error::Geometry(format!(
                    "Triangle {} repeats a vertex {:?}",
                    i, t.vertices
                )));
            }
            if t.material >= mesh.materials.len() {
                return Err(Error::Geometry(format!(
                    "Triangle {} references material {} but there are only {}",
                    i,
                    t.material,
                    mesh.materials.len()
                )));
            }

            let [p0, p1, p2] = t.vertices.map(|v| mesh.positions[v]);
            let n = (p1 - p0).cross(p2 - p0).normalize_or_zero();
            if n == Vec3::ZERO {
                return Err(Error::Geometry(format!("Triangle {} has zero area", i)));
            }
            planes.push((n, -n.dot(p0)));
        }

        let arena_limit = NO_TRIANGLE as usize;
        if self.vertices.len() + mesh.positions.len() > arena_limit
            || self.triangles.len() + mesh.triangles.len() > arena_limit
        {
            return Err(Error::Geometry("Scene arenas are full".into()));
        }

        self.vertices.try_reserve(mesh.positions.len())?;
        self.triangles.try_reserve(mesh.triangles.len())?;
        self.materials.try_reserve(mesh.materials.len())?;

        let first_vertex = self.vertices.len() as u32;
        let first_material = self.materials.len() as u32;
        for &p in &mesh.positions {
            let index = self.vertices.len() as u32;
            self.vertices.push(Vertex { position: p, index });
        }
        self.materials.extend_from_slice(&mesh.materials);

        for (t, (normal, offset)) in mesh.triangles.iter().zip(planes) {
            let index = self.triangles.len() as u32;
            let vertices = t.vertices.map(|v| first_vertex + v as u32);
            let edges = [
                self.edge(vertices[0], vertices[1], index),
                self.edge(vertices[1], vertices[2], index),
                self.edge(vertices[2], vertices[0], index),
            ];
            self.triangles.push(Triangle {
                vertices,
                edges,
                normal,
                offset,
                material: first_material + t.material as u32,
                reflection: mesh.materials[t.material].reflection(),
            });
        }

        log::debug!(
            "Scene: Attached {} vertices and {} triangles",
            mesh.positions.len(),
            mesh.triangles.len()
        );

        Ok(())
    }

    // Finds or creates the edge between two vertices and links `triangle` to it
    fn edge(&mut self, v0: u32, v1: u32, triangle: u32) -> u32 {
        let e = Edge::new(v0, v1);
        let index = match self.edge_lookup.get(&e.vertices) {
            Some(&i) => i,
            None => {
                let i = self.edges.len() as u32;
                self.edges.push(e);
                self.edge_uses.push(0);
                self.edge_lookup.insert(e.vertices, i);
                i
            }
        };
        let uses = &mut self.edge_uses[index as usize];
        if (*uses as usize) < 2 {
            self.edges[index as usize].triangles[*uses as usize] = triangle;
        }
        *uses += 1;
        index
    }

    /// Builds the acceleration structure. The scene is immutable afterwards.
    pub fn finalize(&mut self) -> Result<()> {
        if self.bvh.is_some() {
            return Ok(());
        }
        if self.triangles.is_empty() {
            return Err(Error::Geometry("Scene has no triangles".into()));
        }

        let bounds: Vec<Bounds3> = self
            .triangles
            .iter()
            .map(|t| {
                let [p0, p1, p2] = t.vertices.map(|v| self.vertices[v as usize].position);
                Bounds3::new(p0, p1).union_p(p2)
            })
            .collect();
        let bvh = BoundingVolumeHierarchy::new(&bounds, self.split_method);

        let report = self.validity();
        if report.open_edges > 0 || report.non_manifold_edges > 0 {
            log::warn!(
                "Scene: {} open and {} non-manifold edges, energy may leak",
                report.open_edges,
                report.non_manifold_edges
            );
        }
        log::debug!(
            "Scene: Finalized {} triangles into {} BVH nodes",
            self.triangles.len(),
            bvh.node_count()
        );

        self.edge_lookup = HashMap::new();
        self.bvh = Some(bvh);
        Ok(())
    }

    /// Returns `true` once the scene is finalized and holds geometry.
    pub fn is_ready(&self) -> bool {
        self.bvh.is_some()
    }

    /// Releases all geometry. The scene can be built again from scratch.
    pub fn destroy(&mut self) {
        *self = Self::with_split_method(self.split_method);
    }

    /// Finds the nearest hit further than `tolerance` along `ray`.
    pub fn intersect(&self, ray: &Ray, tolerance: f32) -> Option<Hit> {
        let bvh = self.bvh.as_ref()?;
        bvh.intersect(ray, tolerance, |i, ray| self.intersect_triangle(i, ray))
            .map(|(triangle, t)| Hit {
                triangle,
                t,
                point: ray.point(t),
            })
    }

    /// Checks if the segment from `from` to `to` is blocked, ignoring hits within
    /// `tolerance` of either end.
    pub fn occluded(&self, from: Vec3, to: Vec3, tolerance: f32) -> bool {
        let bvh = match self.bvh.as_ref() {
            Some(bvh) => bvh,
            None => return false,
        };
        let dist = from.distance(to);
        if dist <= 2.0 * tolerance {
            return false;
        }
        let ray = Ray::new(from, (to - from) / dist, dist - tolerance);
        bvh.any_hit(&ray, tolerance, |i, ray| self.intersect_triangle(i, ray))
    }

    fn intersect_triangle(&self, index: u32, ray: &Ray) -> Option<f32> {
        let [p0, p1, p2] = self.triangles[index as usize]
            .vertices
            .map(|v| self.vertices[v as usize].position);
        triangle::intersect(ray, p0, p1, p2)
    }

    /// Computes the edge statistics of the attached geometry.
    pub fn validity(&self) -> MeshReport {
        self.edge_uses
            .iter()
            .fold(MeshReport::default(), |mut report, &uses| {
                match uses {
                    1 => report.open_edges += 1,
                    u if u > 2 => report.non_manifold_edges += 1,
                    _ => (),
                }
                report
            })
    }

    pub fn triangle(&self, index: u32) -> &Triangle {
        &self.triangles[index as usize]
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Returns the bounds of all attached geometry.
    pub fn bounds(&self) -> Bounds3 {
        self.vertices
            .iter()
            .fold(Bounds3::empty(), |b, v| b.union_p(v.position))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
