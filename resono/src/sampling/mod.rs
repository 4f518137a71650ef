//! Emission directions.
//!
//! Rays leave a source through the face centroids of an icosphere. The
//! subdivision level follows the detalization, the maximum solid angle a
//! single ray may cover.

mod icosphere;

pub use icosphere::Icosphere;

use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::PI;

use crate::math::{Quat, Vec3};

/// Subdivision cap, 81920 rays per source.
pub const MAX_ICOSPHERE_LEVEL: u32 = 6;

/// Finds the smallest icosphere level whose faces cover at most `detalization`
/// steradians each.
pub fn icosphere_level(detalization: f32) -> u32 {
    let required = 4.0 * PI / detalization;
    (0..MAX_ICOSPHERE_LEVEL)
        .find(|&level| 20.0 * 4.0f32.powi(level as i32) >= required)
        .unwrap_or(MAX_ICOSPHERE_LEVEL)
}

/// Returns the emission directions for `detalization`.
pub fn emission_directions(detalization: f32) -> Vec<Vec3> {
    Icosphere::new(icosphere_level(detalization)).directions()
}

/// Draws a uniformly distributed rotation.
pub fn random_rotation(rng: &mut Pcg32) -> Quat {
    // Shoemake, Uniform random rotations, Graphics Gems III
    let u1: f32 = rng.gen();
    let u2: f32 = rng.gen();
    let u3: f32 = rng.gen();
    let r1 = (1.0 - u1).sqrt();
    let r2 = u1.sqrt();
    let (s2, c2) = (2.0 * PI * u2).sin_cos();
    let (s3, c3) = (2.0 * PI * u3).sin_cos();
    Quat::from_xyzw(r1 * s2, r1 * c2, r2 * s3, r2 * c3).normalize()
}

/// Returns the deterministic rotation for stream `stream` of `seed`.
pub fn seeded_rotation(seed: u64, stream: u64) -> Quat {
    // Pcg has uncorrelated streams so let's leverage that
    let mut rng = Pcg32::new(seed, stream);
    random_rotation(&mut rng)
}
