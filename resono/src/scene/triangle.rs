use crate::math::{Ray, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Shapes/Triangles.html

fn max_dimension(v: Vec3) -> usize {
    if v.x > v.y && v.x > v.z {
        0
    } else if v.y > v.z {
        1
    } else {
        2
    }
}

fn permuted(v: Vec3, x: usize, y: usize, z: usize) -> Vec3 {
    Vec3::new(v[x], v[y], v[z])
}

/// Watertight ray-triangle test. Returns the distance along `ray` to the hit in
/// `(0, ray.t_max]`. Both faces are hit.
pub fn intersect(ray: &Ray, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<f32> {
    // The test is done in a space where the ray lies on the +z axis. This way we
    // don't get incorrect misses on rays that hit directly on a shared edge.

    // Do things in relation to ray's origin
    let mut p0t = p0 - ray.o;
    let mut p1t = p1 - ray.o;
    let mut p2t = p2 - ray.o;

    // Permute direction so that Z is largest
    // This ensures there is a non-zero magnitude on Z
    let kz = max_dimension(ray.d.abs());
    let kx = if kz < 2 { kz + 1 } else { 0 };
    let ky = if kx < 2 { kx + 1 } else { 0 };
    p0t = permuted(p0t, kx, ky, kz);
    p1t = permuted(p1t, kx, ky, kz);
    p2t = permuted(p2t, kx, ky, kz);
    let d = permuted(ray.d, kx, ky, kz);

    // Shear to get +Z forward
    // Defer shearing Z since we won't need it if we don't intersect
    let sx = -d.x / d.z;
    let sy = -d.y / d.z;
    let sz = 1.0 / d.z;
    p0t.x += sx * p0t.z;
    p0t.y += sy * p0t.z;
    p1t.x += sx * p1t.z;
    p1t.y += sy * p1t.z;
    p2t.x += sx * p2t.z;
    p2t.y += sy * p2t.z;

    // Edge coefficients
    let (e0, e1, e2) = {
        // No need for Z since we know d is on +Z
        let e0 = p1t.x * p2t.y - p1t.y * p2t.x;
        let e1 = p2t.x * p0t.y - p2t.y * p0t.x;
        let e2 = p0t.x * p1t.y - p0t.y * p1t.x;

        // Fall back to f64 if we're exactly on any edge
        if (e0 == 0.0) || (e1 == 0.0) || (e2 == 0.0) {
            let e0 = (p1t.x as f64) * (p2t.y as f64) - (p1t.y as f64) * (p2t.x as f64);
            let e1 = (p2t.x as f64) * (p0t.y as f64) - (p2t.y as f64) * (p0t.x as f64);
            let e2 = (p0t.x as f64) * (p1t.y as f64) - (p0t.y as f64) * (p1t.x as f64);
            (e0 as f32, e1 as f32, e2 as f32)
        } else {
            (e0, e1, e2)
        }
    };

    // Edge test, i.e. if we miss the triangle
    if ((e0 < 0.0) || (e1 < 0.0) || (e2 < 0.0)) && ((e0 > 0.0) || (e1 > 0.0) || (e2 > 0.0)) {
        return None;
    }

    // Determinant test, i.e. if we hit the triangle edge-on
    let det = e0 + e1 + e2;
    if det == 0.0 {
        return None;
    }

    // Scaled hit distance
    let p0z = p0t.z * sz;
    let p1z = p1t.z * sz;
    let p2z = p2t.z * sz;
    let t_scaled = e0 * p0z + e1 * p1z + e2 * p2z;

    // Test against ray range
    if ((det < 0.0) && ((t_scaled >= 0.0) || (t_scaled < ray.t_max * det)))
        || ((det > 0.0) && ((t_scaled <= 0.0) || (t_scaled > ray.t_max * det)))
    {
        return None;
    }

    let t = t_scaled / det;
    if t.is_finite() {
        Some(t)
    } else {
        None
    }
}
