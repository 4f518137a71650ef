//! Directional gain of sources and captures.
//!
//! Patterns are functions of `c`, the cosine between the transducer axis and
//! the direction of interest. Gains are amplitude gains, the engine works with
//! their squares.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::error::{Error, Result};

/// Radiation pattern of a source.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    EnumVariantNames,
)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourcePattern {
    /// Point source, radiates evenly in all directions.
    Omni,
    /// Spherical source that emits from its surface, radiates evenly.
    #[strum(serialize = "icosphere", serialize = "sphere")]
    Icosphere,
    Cardioid,
    FigureEight,
    /// Emits only in front of the axis.
    Hemisphere,
}

impl SourcePattern {
    /// Returns the amplitude gain towards a direction at cosine `c` from the axis.
    pub fn gain(&self, c: f32) -> f32 {
        match self {
            SourcePattern::Omni | SourcePattern::Icosphere => 1.0,
            SourcePattern::Cardioid => 0.5 + 0.5 * c,
            SourcePattern::FigureEight => c,
            SourcePattern::Hemisphere => {
                if c > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Returns the fraction of energy emitted towards a direction at cosine `c`.
    pub fn energy(&self, c: f32) -> f32 {
        let g = self.gain(c);
        g * g
    }

    /// Returns `true` if the gain depends on the axis direction.
    pub fn is_directional(&self) -> bool {
        !matches!(self, SourcePattern::Omni | SourcePattern::Icosphere)
    }
}

impl TryFrom<i32> for SourcePattern {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(SourcePattern::Omni),
            1 => Ok(SourcePattern::Icosphere),
            2 => Ok(SourcePattern::Cardioid),
            3 => Ok(SourcePattern::FigureEight),
            4 => Ok(SourcePattern::Hemisphere),
            v => Err(Error::InvalidArgument(format!(
                "Unrecognized source pattern {}",
                v
            ))),
        }
    }
}

/// Pickup pattern of a capture.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    EnumVariantNames,
)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CapturePattern {
    Omni,
    Cardioid,
    SuperCardioid,
    HyperCardioid,
    /// Bidirectional, the rear lobe has inverted polarity.
    FigureEight,
}

impl CapturePattern {
    /// Returns the amplitude sensitivity for sound arriving from cosine `c`
    /// off the axis.
    pub fn gain(&self, c: f32) -> f32 {
        match self {
            CapturePattern::Omni => 1.0,
            CapturePattern::Cardioid => 0.5 + 0.5 * c,
            CapturePattern::SuperCardioid => 0.37 + 0.63 * c,
            CapturePattern::HyperCardioid => 0.25 + 0.75 * c,
            CapturePattern::FigureEight => c,
        }
    }

    /// Returns the energy response, squared gain with the polarity of the gain.
    pub fn response(&self, c: f32) -> f32 {
        let g = self.gain(c);
        g * g.abs()
    }

    pub fn is_directional(&self) -> bool {
        !matches!(self, CapturePattern::Omni)
    }
}

impl TryFrom<i32> for CapturePattern {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(CapturePattern::Omni),
            1 => Ok(CapturePattern::Cardioid),
            2 => Ok(CapturePattern::SuperCardioid),
            3 => Ok(CapturePattern::HyperCardioid),
            4 => Ok(CapturePattern::FigureEight),
            v => Err(Error::InvalidArgument(format!(
                "Unrecognized capture pattern {}",
                v
            ))),
        }
    }
}
