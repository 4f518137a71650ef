mod bounds;
mod ray;

pub use bounds::Bounds3;
pub use glam::{EulerRot, Quat, Vec3};
pub use ray::Ray;

/// Mirrors direction `d` about the plane with unit normal `n`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - n * (2.0 * d.dot(n))
}

/// Returns `true` if all components of `v` are finite.
#[inline]
pub fn is_finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
