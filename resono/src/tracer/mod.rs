//! The ray-trace engine.
//!
//! A [`RayTracer`] is configured with a scene, sources, captures and bindings,
//! then [`RayTracer::process`] traces every source into the bound buffers:
//!
//! 1. Each source contributes a direct sound item and one item per emission
//!    direction, see [`crate::sampling`].
//! 2. The items are split into contiguous batches, one per worker thread.
//! 3. Each worker follows its paths through their specular reflections and
//!    deposits the arrivals into private partial buffers.
//! 4. The partials are merged into the bound buffers in worker order.
//!
//! Configuration problems are reported before any tracing starts and a failing
//! pass never writes into the bound buffers.

mod path;
mod settings;
mod trace_manager;
mod trace_worker;

pub use path::{PathStats, NEGLIGIBLE_FRACTION};
pub use settings::{RayTraceSettings, SOUND_SPEED};

use std::{
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use path::{TraceContext, WorkItem};

use crate::{
    accumulator::{self, BindingTable},
    binding::{Binding, OrderRange},
    capture_config::CaptureSettings,
    error::{Error, Result},
    math::Vec3,
    pattern::{CapturePattern, SourcePattern},
    runtime::{self, Runtime},
    sample::SharedBuffer,
    sampling,
    scene::Scene,
    transducer::{Capture, Source, Transducer},
};

/// Summary of a [`RayTracer::process`] pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProcessStats {
    /// Emitted rays over all sources.
    pub rays: usize,
    /// Traced path segments, i.e. surface hits.
    pub segments: usize,
    /// Arrivals that reached the bindings.
    pub arrivals: usize,
    /// Negligible arrivals and deposits that fell outside the buffers. An
    /// arrival inside the last sample is kept even though the share past the
    /// end is lost.
    pub dropped: usize,
    pub elapsed: Duration,
}

pub struct RayTracer {
    settings: RayTraceSettings,
    runtime: Option<Arc<Runtime>>,
    scene: Option<Arc<Scene>>,
    sources: Vec<Source>,
    captures: Vec<Capture>,
    bindings: Vec<Binding>,
}

impl RayTracer {
    pub fn new() -> Self {
        Self {
            settings: RayTraceSettings::default(),
            runtime: None,
            scene: None,
            sources: Vec::new(),
            captures: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn with_settings(settings: RayTraceSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::new()
        })
    }

    /// Attaches the process runtime and allocates the registries.
    pub fn init(&mut self) -> Result<()> {
        if self.runtime.is_some() {
            return Ok(());
        }
        self.sources.try_reserve(4)?;
        self.captures.try_reserve(8)?;
        self.bindings.try_reserve(16)?;
        let runtime = runtime::init();
        log::debug!(
            "RayTracer: Initialized with backend '{}'",
            runtime.backend().name
        );
        self.runtime = Some(runtime);
        Ok(())
    }

    fn runtime(&self) -> Result<&Arc<Runtime>> {
        self.runtime
            .as_ref()
            .ok_or_else(|| Error::NotReady("RayTracer is not initialized".into()))
    }

    pub fn settings(&self) -> &RayTraceSettings {
        &self.settings
    }

    /// Replaces all settings at once.
    pub fn set_settings(&mut self, settings: RayTraceSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    // Applies `f` to a copy of the settings and keeps it if it validates
    fn update_settings(&mut self, f: impl FnOnce(&mut RayTraceSettings)) -> Result<()> {
        let mut settings = self.settings;
        f(&mut settings);
        self.set_settings(settings)
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<()> {
        self.update_settings(|s| s.sample_rate = sample_rate)
    }

    pub fn set_energy_threshold(&mut self, energy_threshold: f32) -> Result<()> {
        self.update_settings(|s| s.energy_threshold = energy_threshold)
    }

    pub fn set_tolerance(&mut self, tolerance: f32) -> Result<()> {
        self.update_settings(|s| s.tolerance = tolerance)
    }

    pub fn set_detalization(&mut self, detalization: f32) -> Result<()> {
        self.update_settings(|s| s.detalization = detalization)
    }

    pub fn set_max_reflections(&mut self, max_reflections: u32) -> Result<()> {
        self.update_settings(|s| s.max_reflections = max_reflections)
    }

    pub fn set_sound_speed(&mut self, sound_speed: f32) -> Result<()> {
        self.update_settings(|s| s.sound_speed = sound_speed)
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.settings.seed = seed;
    }

    /// Finalizes `scene` and makes it the traced scene.
    pub fn set_scene(&mut self, mut scene: Scene) -> Result<()> {
        self.runtime()?;
        scene.finalize()?;
        self.scene = Some(Arc::new(scene));
        Ok(())
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_deref()
    }

    /// Registers a source and returns its index.
    pub fn add_source(&mut self, transducer: Transducer, pattern: SourcePattern) -> Result<usize> {
        self.runtime()?;
        let source = Source::new(transducer, pattern)?;
        self.sources.try_reserve(1)?;
        self.sources.push(source);
        log::debug!("RayTracer: Source {} {:?}", self.sources.len() - 1, source);
        Ok(self.sources.len() - 1)
    }

    /// Registers a source with a pattern given by name.
    pub fn add_source_named(&mut self, transducer: Transducer, pattern: &str) -> Result<usize> {
        let pattern = SourcePattern::from_str(pattern)?;
        self.add_source(transducer, pattern)
    }

    /// Registers a capture and returns its index. Indices start from 0 and
    /// increase by one per capture.
    pub fn add_capture(&mut self, transducer: Transducer, pattern: CapturePattern) -> Result<usize> {
        self.runtime()?;
        let capture = Capture::new(transducer, pattern)?;
        self.captures.try_reserve(1)?;
        self.captures.push(capture);
        log::debug!("RayTracer: Capture {} {:?}", self.captures.len() - 1, capture);
        Ok(self.captures.len() - 1)
    }

    /// Registers a capture with a pattern given by name.
    pub fn add_capture_named(&mut self, transducer: Transducer, pattern: &str) -> Result<usize> {
        let pattern = CapturePattern::from_str(pattern)?;
        self.add_capture(transducer, pattern)
    }

    /// Registers every capture of an arrangement, left capsule first.
    pub fn add_capture_config(&mut self, settings: &CaptureSettings) -> Result<Vec<usize>> {
        self.runtime()?;
        let captures = settings.captures()?;
        let mut ret = Vec::with_capacity(captures.len());
        for c in captures {
            ret.push(self.add_capture(c.transducer, c.pattern)?);
        }
        Ok(ret)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }

    /// Binds `capture` to `channel` of `buffer` for the reflection orders
    /// `[min_order, max_order]`. `-1` leaves a bound open.
    pub fn bind_capture(
        &mut self,
        capture: usize,
        buffer: SharedBuffer,
        channel: usize,
        min_order: i32,
        max_order: i32,
    ) -> Result<()> {
        let range = OrderRange::from_sentinels(min_order, max_order)?;
        self.bind(capture, buffer, channel, range)
    }

    pub fn bind(
        &mut self,
        capture: usize,
        buffer: SharedBuffer,
        channel: usize,
        range: OrderRange,
    ) -> Result<()> {
        self.runtime()?;
        if capture >= self.captures.len() {
            return Err(Error::InvalidArgument(format!(
                "Capture {} out of range, {} registered",
                capture,
                self.captures.len()
            )));
        }
        let channels = buffer
            .lock()
            .map_err(|_| Error::Resource("Sample buffer lock is poisoned".into()))?
            .channel_count();
        if channel >= channels {
            return Err(Error::InvalidArgument(format!(
                "Channel {} out of range for a {} channel buffer",
                channel, channels
            )));
        }
        self.bindings.try_reserve(1)?;
        self.bindings.push(Binding {
            capture,
            buffer,
            channel,
            range,
        });
        log::debug!(
            "RayTracer: Bound capture {} to channel {} for orders {}",
            capture,
            channel,
            range
        );
        Ok(())
    }

    /// Traces the scene into the bound buffers.
    ///
    /// `thread_count` of 0 uses one worker per hardware thread. Every arrival is
    /// scaled by `energy_scale` before it is added to the buffers.
    pub fn process(&self, thread_count: usize, energy_scale: f32) -> Result<ProcessStats> {
        let start = Instant::now();

        let runtime = self.runtime()?;
        let scene = match self.scene.as_deref() {
            Some(scene) if scene.is_ready() => scene,
            _ => return Err(Error::NotReady("No scene set".into())),
        };
        if self.sources.is_empty() {
            return Err(Error::NotReady("No sources registered".into()));
        }
        if self.captures.is_empty() {
            return Err(Error::NotReady("No captures registered".into()));
        }
        if self.bindings.is_empty() {
            return Err(Error::NotReady("No capture bindings".into()));
        }
        self.settings.validate()?;
        if !energy_scale.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "Energy scale {} is not finite",
                energy_scale
            )));
        }

        let table = BindingTable::new(&self.bindings, self.captures.len())?;
        let directions = self.emission_directions()?;
        let items = work_items(&directions)?;

        let thread_count = if thread_count == 0 {
            runtime.hardware_threads()
        } else {
            thread_count
        };

        let ctx = TraceContext {
            scene,
            sources: &self.sources,
            captures: &self.captures,
            table: &table,
            settings: &self.settings,
            directions: &directions,
            max_distance: self.settings.distance(table.max_length() as f32),
        };

        let (accumulators, stats) = trace_manager::run(&ctx, &items, thread_count)?;
        accumulator::merge(
            &table,
            &accumulators,
            energy_scale,
            self.settings.sample_rate,
            runtime.backend(),
        )?;

        let ret = ProcessStats {
            rays: stats.rays,
            segments: stats.segments,
            arrivals: stats.arrivals,
            dropped: stats.dropped,
            elapsed: start.elapsed(),
        };
        log::info!(
            "RayTracer: {} rays, {} segments, {} arrivals ({} dropped) in {:.3}s",
            ret.rays,
            ret.segments,
            ret.arrivals,
            ret.dropped,
            ret.elapsed.as_secs_f32()
        );

        Ok(ret)
    }

    // Emission directions of each source, rotated per source when seeded
    fn emission_directions(&self) -> Result<Vec<Vec<Vec3>>> {
        let base = sampling::emission_directions(self.settings.detalization);
        log::debug!(
            "RayTracer: {} rays per source at detalization {}",
            base.len(),
            self.settings.detalization
        );

        let mut ret = Vec::new();
        ret.try_reserve_exact(self.sources.len())?;
        for i in 0..self.sources.len() {
            let mut directions = Vec::new();
            directions.try_reserve_exact(base.len())?;
            match self.settings.seed {
                Some(seed) => {
                    let rotation = sampling::seeded_rotation(seed, i as u64);
                    directions.extend(base.iter().map(|&d| (rotation * d).normalize()));
                }
                None => directions.extend_from_slice(&base),
            }
            ret.push(directions);
        }
        Ok(ret)
    }

    /// Drops the scene, the sources, the captures and the bindings.
    pub fn destroy(&mut self) {
        self.scene = None;
        self.sources.clear();
        self.captures.clear();
        self.bindings.clear();
        self.runtime = None;
        log::debug!("RayTracer: Destroyed");
    }
}

impl Default for RayTracer {
    fn default() -> Self {
        Self::new()
    }
}

// Per source, the direct sound followed by every emitted ray
fn work_items(directions: &[Vec<Vec3>]) -> Result<Vec<WorkItem>> {
    let count = directions.iter().map(|d| d.len() + 1).sum();
    let mut ret = Vec::new();
    ret.try_reserve_exact(count)?;
    for (source, dirs) in directions.iter().enumerate() {
        ret.push(WorkItem::Direct { source });
        ret.extend((0..dirs.len()).map(|direction| WorkItem::Ray { source, direction }));
    }
    Ok(ret)
}
