use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Speed of sound in air at 20 degrees Celsius, m/s.
pub const SOUND_SPEED: f32 = 340.29;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RayTraceSettings {
    /// Hz
    pub sample_rate: u32,
    /// Fraction of a path's initial energy below which it is discarded.
    pub energy_threshold: f32,
    /// Geometric epsilon in scene units.
    pub tolerance: f32,
    /// Maximum solid angle, in steradians, a single emitted ray may cover.
    pub detalization: f32,
    /// Hard cap on the reflection order of a path.
    pub max_reflections: u32,
    /// Scene units per second.
    pub sound_speed: f32,
    /// Rotates each source's emission directions deterministically when set.
    pub seed: Option<u64>,
}

impl Default for RayTraceSettings {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            energy_threshold: 1e-5,
            tolerance: 1e-5,
            detalization: 0.01,
            max_reflections: 10000,
            sound_speed: SOUND_SPEED,
            seed: None,
        }
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

impl RayTraceSettings {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidArgument("sample_rate must be positive".into()));
        }
        positive("energy_threshold", self.energy_threshold)?;
        positive("tolerance", self.tolerance)?;
        positive("detalization", self.detalization)?;
        positive("sound_speed", self.sound_speed)?;
        Ok(())
    }

    /// Converts a path length in scene units into a delay in samples.
    pub fn delay(&self, distance: f32) -> f32 {
        distance / self.sound_speed * (self.sample_rate as f32)
    }

    /// Converts a delay in samples into a path length in scene units.
    pub fn distance(&self, delay: f32) -> f32 {
        delay / (self.sample_rate as f32) * self.sound_speed
    }
}
