//! Acoustic surface materials.

use crate::error::{Error, Result};

/// Energy absorption of a surface.
///
/// The engine is broadband, the presets use the mid band (around 2.5 kHz)
/// absorption of the common building materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Fraction of the incident energy absorbed on reflection, in `[0, 1]`.
    pub absorption: f32,
}

impl Material {
    pub const GENERIC: Self = Self { absorption: 0.20 };
    pub const BRICK: Self = Self { absorption: 0.04 };
    pub const CONCRETE: Self = Self { absorption: 0.07 };
    pub const CERAMIC: Self = Self { absorption: 0.02 };
    pub const GRAVEL: Self = Self { absorption: 0.70 };
    pub const CARPET: Self = Self { absorption: 0.69 };
    pub const GLASS: Self = Self { absorption: 0.03 };
    pub const PLASTER: Self = Self { absorption: 0.06 };
    pub const WOOD: Self = Self { absorption: 0.07 };
    pub const METAL: Self = Self { absorption: 0.07 };
    pub const ROCK: Self = Self { absorption: 0.20 };
    /// Ideal mirror, reflects everything.
    pub const RIGID: Self = Self { absorption: 0.0 };

    pub fn new(absorption: f32) -> Result<Self> {
        let ret = Self { absorption };
        ret.validate()?;
        Ok(ret)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.absorption) {
            return Err(Error::Geometry(format!(
                "Material absorption {} outside [0, 1]",
                self.absorption
            )));
        }
        Ok(())
    }

    /// Returns the fraction of the incident energy that survives a reflection.
    pub fn reflection(&self) -> f32 {
        1.0 - self.absorption
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::GENERIC
    }
}
