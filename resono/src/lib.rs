//! Geometric acoustics by specular ray tracing.
//!
//! Sound leaves point-like [`Source`]s along icosphere directions, bounces off
//! the triangles of a [`Scene`] and is picked up by directional [`Capture`]s.
//! Every arrival is binned by its delay into the [`SampleBuffer`] channels the
//! capture is bound to, selected by reflection order.
//!
//! ```no_run
//! use resono::{
//!     CapturePattern, Material, Mesh, RayTracer, SampleBuffer, Scene, SourcePattern, Transducer,
//!     Vec3,
//! };
//!
//! # fn main() -> resono::Result<()> {
//! let mut scene = Scene::new();
//! scene.attach(&Mesh::cuboid(
//!     Vec3::new(-2.0, -2.0, -2.0),
//!     Vec3::new(2.0, 2.0, 2.0),
//!     Material::CONCRETE,
//! ))?;
//!
//! let mut tracer = RayTracer::new();
//! tracer.init()?;
//! tracer.set_scene(scene)?;
//! tracer.add_source(
//!     Transducer::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.3, 0.0, 0.0)),
//!     SourcePattern::Icosphere,
//! )?;
//! let capture = tracer.add_capture(
//!     Transducer::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-0.05, 0.0, 0.0)),
//!     CapturePattern::Cardioid,
//! )?;
//!
//! let buffer = SampleBuffer::shared(1, 48000);
//! tracer.bind_capture(capture, buffer.clone(), 0, -1, -1)?;
//! tracer.process(0, 1.0)?;
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod binding;
pub mod capture_config;
pub mod dsp;
pub mod error;
pub mod geometry;
pub mod math;
pub mod pattern;
pub mod runtime;
pub mod sample;
pub mod sampling;
pub mod scene;
pub mod tracer;
pub mod transducer;

pub use binding::{Binding, OrderRange};
pub use capture_config::{CaptureConfig, CaptureSettings};
pub use error::{Error, Result};
pub use geometry::{Material, Mesh, MeshTriangle};
pub use math::Vec3;
pub use pattern::{CapturePattern, SourcePattern};
pub use sample::{SampleBuffer, SharedBuffer};
pub use scene::{MeshReport, Scene};
pub use tracer::{ProcessStats, RayTraceSettings, RayTracer, SOUND_SPEED};
pub use transducer::{Capture, Source, Transducer};
