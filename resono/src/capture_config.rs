//! Microphone arrangements that expand into one or two captures.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    error::{Error, Result},
    math::{EulerRot, Quat, Vec3},
    pattern::CapturePattern,
    transducer::{Capture, Transducer},
};

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    EnumVariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum CaptureConfig {
    /// Single capsule.
    Mono,
    /// Coincident pair angled apart.
    XY,
    /// Spaced pair facing forward.
    AB,
    /// Spaced pair angled apart.
    ORTF,
    /// Forward facing mid capsule with a coincident sideways capsule.
    MS,
}

/// Placement of a capture arrangement.
///
/// The arrangement faces +X with +Y to its left and +Z up before it is
/// rotated by `yaw` (around Z), `pitch` (around Y) and `roll` (around X).
/// Angles are in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CaptureSettings {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    /// Capsule radius.
    pub capsule: f32,
    pub config: CaptureConfig,
    /// Angle between the capsules of XY and ORTF.
    pub angle: f32,
    /// Distance between the capsules of AB and ORTF.
    pub distance: f32,
    /// Pattern of the forward facing capsules.
    pub direction: CapturePattern,
    /// Pattern of the sideways capsule of MS.
    pub side: CapturePattern,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            capsule: 0.015,
            config: CaptureConfig::Mono,
            angle: 0.0,
            distance: 0.0,
            direction: CapturePattern::Cardioid,
            side: CapturePattern::FigureEight,
        }
    }
}

impl CaptureSettings {
    /// Expands the arrangement into captures, left capsule first.
    pub fn captures(&self) -> Result<Vec<Capture>> {
        let finite = [self.yaw, self.pitch, self.roll, self.angle, self.distance]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidArgument(format!(
                "Non-finite capture settings {:?}",
                self
            )));
        }
        if !(self.capsule > 0.0 && self.capsule.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "Capsule radius {} must be positive",
                self.capsule
            )));
        }
        if self.distance < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "Capsule distance {} must not be negative",
                self.distance
            )));
        }

        let orientation = Quat::from_euler(
            EulerRot::ZYX,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        );
        let half_angle = self.angle.to_radians() * 0.5;
        let half_distance = self.distance * 0.5;

        // Capsule offset along +Y, facing and pattern in the arrangement's frame
        let capsules: Vec<(f32, Vec3, CapturePattern)> = match self.config {
            CaptureConfig::Mono => vec![(0.0, Vec3::X, self.direction)],
            CaptureConfig::XY => vec![
                (0.0, Quat::from_rotation_z(half_angle) * Vec3::X, self.direction),
                (0.0, Quat::from_rotation_z(-half_angle) * Vec3::X, self.direction),
            ],
            CaptureConfig::AB => vec![
                (half_distance, Vec3::X, self.direction),
                (-half_distance, Vec3::X, self.direction),
            ],
            CaptureConfig::ORTF => vec![
                (
                    half_distance,
                    Quat::from_rotation_z(half_angle) * Vec3::X,
                    self.direction,
                ),
                (
                    -half_distance,
                    Quat::from_rotation_z(-half_angle) * Vec3::X,
                    self.direction,
                ),
            ],
            CaptureConfig::MS => vec![(0.0, Vec3::X, self.direction), (0.0, Vec3::Y, self.side)],
        };

        capsules
            .into_iter()
            .map(|(offset, facing, pattern)| {
                let position = self.position + orientation * (Vec3::Y * offset);
                let axis = orientation * facing * self.capsule;
                Capture::new(Transducer::new(position, axis), pattern)
            })
            .collect()
    }
}
