use super::Vec3;

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Rays.html

#[derive(Copy, PartialEq, Clone, Debug)]
pub struct Ray {
    pub o: Vec3,
    /// Expected to be normalized so that `t` is a distance.
    pub d: Vec3,
    pub t_max: f32,
}

impl Ray {
    /// Creates a new `Ray`.
    pub fn new(o: Vec3, d: Vec3, t_max: f32) -> Self {
        let ret = Self { o, d, t_max };
        debug_assert!(!ret.has_nans());
        ret
    }

    /// Checks if any of the members in this `Ray` contain NaNs.
    pub fn has_nans(&self) -> bool {
        self.o.is_nan() || self.d.is_nan() || self.t_max.is_nan()
    }

    /// Finds the point on this `Ray` at distance `t`.
    pub fn point(&self, t: f32) -> Vec3 {
        self.o + self.d * t
    }
}
