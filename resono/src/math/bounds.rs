use std::ops::Index;

use super::{Ray, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Bounding_Boxes.html

/// Axis-aligned three-dimensional bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3 {
    /// The minimum extent of the bounds.
    pub p_min: Vec3,
    /// The maximum extent of the bounds.
    pub p_max: Vec3,
}

impl Bounds3 {
    /// Creates the smallest `Bounds3` that contains both points.
    pub fn new(p0: Vec3, p1: Vec3) -> Self {
        Self {
            p_min: p0.min(p1),
            p_max: p0.max(p1),
        }
    }

    /// Creates an empty `Bounds3` that any union will overwrite.
    pub fn empty() -> Self {
        Self {
            p_min: Vec3::splat(f32::MAX),
            p_max: Vec3::splat(f32::MIN),
        }
    }

    /// Returns `true` if this `Bounds3` contains no points.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Returns the union of this and `other`.
    pub fn union_b(&self, other: Bounds3) -> Self {
        Self {
            p_min: self.p_min.min(other.p_min),
            p_max: self.p_max.max(other.p_max),
        }
    }

    /// Returns the union of this and `p`.
    pub fn union_p(&self, p: Vec3) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns the vector from `p_min` to `p_max`.
    pub fn diagonal(&self) -> Vec3 {
        self.p_max - self.p_min
    }

    /// Returns the center point.
    pub fn centroid(&self) -> Vec3 {
        (self.p_min + self.p_max) * 0.5
    }

    /// Finds the axis of the maximum extent of this `Bounds3`
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Checks if `ray` hits this `Bounds3` within `[0, ray.t_max]`.
    /// `inv_dir` and `dir_is_neg` are precomputed from `ray` as an optimization.
    pub fn intersect(&self, ray: &Ray, inv_dir: Vec3, dir_is_neg: [bool; 3]) -> bool {
        let mut t0 = 0.0f32;
        let mut t1 = ray.t_max;
        for i in 0..3 {
            let near = (self[dir_is_neg[i] as usize][i] - ray.o[i]) * inv_dir[i];
            let far = (self[1 - (dir_is_neg[i] as usize)][i] - ray.o[i]) * inv_dir[i];
            // NaNs from 0 * inf on a slab boundary fail the comparisons and keep the old value
            if near > t0 {
                t0 = near;
            }
            if far < t1 {
                t1 = far;
            }
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for Bounds3 {
    type Output = Vec3;

    fn index(&self, i: usize) -> &Vec3 {
        match i {
            0 => &self.p_min,
            1 => &self.p_max,
            _ => panic!("Bounds3 index {} out of range", i),
        }
    }
}
