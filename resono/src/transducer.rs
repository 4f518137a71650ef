//! Placement of sources and captures.

use crate::{
    error::{Error, Result},
    math::{self, Vec3},
    pattern::{CapturePattern, SourcePattern},
};

/// Position and orientation of a source or a capture.
///
/// `axis` points where the transducer faces and its length is the physical
/// radius: the speaker cone of a source or the capsule of a capture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transducer {
    pub position: Vec3,
    pub axis: Vec3,
}

impl Transducer {
    pub fn new(position: Vec3, axis: Vec3) -> Self {
        Self { position, axis }
    }

    pub fn radius(&self) -> f32 {
        self.axis.length()
    }

    /// Returns the unit facing direction, `None` for a zero axis.
    pub fn direction(&self) -> Option<Vec3> {
        self.axis.try_normalize()
    }

    /// Returns the cosine between the facing direction and `dir`.
    /// Transducers without a direction face everywhere.
    pub fn cosine(&self, dir: Vec3) -> f32 {
        self.direction().map_or(1.0, |axis| axis.dot(dir))
    }

    /// Checks that the placement is usable, `directional` transducers need a
    /// non-zero axis.
    pub fn validate(&self, directional: bool) -> Result<()> {
        if !math::is_finite(self.position) || !math::is_finite(self.axis) {
            return Err(Error::InvalidArgument(format!(
                "Non-finite transducer {:?}",
                self
            )));
        }
        if directional && self.direction().is_none() {
            return Err(Error::InvalidArgument(
                "Directional pattern needs a non-zero axis".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Source {
    pub transducer: Transducer,
    pub pattern: SourcePattern,
}

impl Source {
    pub fn new(transducer: Transducer, pattern: SourcePattern) -> Result<Self> {
        transducer.validate(pattern.is_directional())?;
        Ok(Self {
            transducer,
            pattern,
        })
    }

    /// Returns the fraction of the emitted energy that leaves towards unit `dir`.
    pub fn weight(&self, dir: Vec3) -> f32 {
        self.pattern.energy(self.transducer.cosine(dir))
    }

    /// Returns the point where a ray towards unit `dir` leaves the source.
    pub fn emission_point(&self, dir: Vec3) -> Vec3 {
        self.transducer.position + dir * self.transducer.radius()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Capture {
    pub transducer: Transducer,
    pub pattern: CapturePattern,
}

impl Capture {
    /// Captures need a non-zero capsule radius whatever their pattern, a
    /// point capture can't pick up any energy.
    pub fn new(transducer: Transducer, pattern: CapturePattern) -> Result<Self> {
        transducer.validate(pattern.is_directional())?;
        if !(transducer.radius() > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "Capture at {} needs a non-zero capsule radius",
                transducer.position
            )));
        }
        Ok(Self {
            transducer,
            pattern,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.transducer.position
    }

    /// Returns the energy response to sound arriving from unit `dir`, which
    /// points from the capture towards where the sound comes from.
    pub fn response(&self, dir: Vec3) -> f32 {
        self.pattern.response(self.transducer.cosine(dir))
    }

    /// Returns the fraction of energy a path of length `distance` delivers to
    /// the capsule.
    pub fn spread(&self, distance: f32) -> f32 {
        let r2 = self.transducer.radius().powi(2);
        if r2 == 0.0 {
            return 0.0;
        }
        r2 / (r2 + distance * distance)
    }
}
