//! Tracing of a single work item: the direct sound of a source or one emitted
//! ray followed through its reflections.

use std::ops::AddAssign;

use super::RayTraceSettings;
use crate::{
    accumulator::{Accumulator, Arrival, BindingTable},
    math::{self, Ray, Vec3},
    scene::Scene,
    transducer::{Capture, Source},
};

/// Contributions weaker than this fraction of the energy threshold, relative
/// to the path's initial energy, are dropped before they reach the buffers.
pub const NEGLIGIBLE_FRACTION: f32 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkItem {
    Direct { source: usize },
    Ray { source: usize, direction: usize },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PathStats {
    pub rays: usize,
    pub segments: usize,
    pub arrivals: usize,
    pub dropped: usize,
}

impl AddAssign for PathStats {
    fn add_assign(&mut self, other: Self) {
        self.rays += other.rays;
        self.segments += other.segments;
        self.arrivals += other.arrivals;
        self.dropped += other.dropped;
    }
}

/// Everything a worker reads while tracing.
pub struct TraceContext<'a> {
    pub scene: &'a Scene,
    pub sources: &'a [Source],
    pub captures: &'a [Capture],
    pub table: &'a BindingTable,
    pub settings: &'a RayTraceSettings,
    /// Emission directions of each source.
    pub directions: &'a [Vec<Vec3>],
    /// Paths longer than this can't reach any bound buffer.
    pub max_distance: f32,
}

struct PathState {
    ray: Ray,
    energy: f32,
    // Travelled distance from the source surface
    length: f32,
    order: u32,
}

impl<'a> TraceContext<'a> {
    pub fn trace(&self, item: WorkItem, acc: &mut Accumulator, stats: &mut PathStats) {
        match item {
            WorkItem::Direct { source } => self.trace_direct(source, acc, stats),
            WorkItem::Ray { source, direction } => {
                self.trace_ray(source, self.directions[source][direction], acc, stats)
            }
        }
    }

    fn deposit(
        &self,
        acc: &mut Accumulator,
        stats: &mut PathStats,
        arrival: Arrival,
        floor: f32,
    ) {
        if arrival.energy.abs() < floor || !arrival.energy.is_finite() {
            stats.dropped += 1;
            return;
        }
        stats.arrivals += 1;
        acc.add(self.table, &arrival);
    }

    fn trace_direct(&self, source_index: usize, acc: &mut Accumulator, stats: &mut PathStats) {
        let source = &self.sources[source_index];
        let tolerance = self.settings.tolerance;
        let floor = NEGLIGIBLE_FRACTION * self.settings.energy_threshold;
        let origin = source.transducer.position;

        for (capture_index, capture) in self.captures.iter().enumerate() {
            if !self.table.accepts(capture_index, 0) {
                continue;
            }
            let to_capture = capture.position() - origin;
            let dist = to_capture.length();
            if dist <= tolerance {
                continue;
            }
            let dir = to_capture / dist;
            if self.scene.occluded(origin, capture.position(), tolerance) {
                continue;
            }

            let length = (dist - source.transducer.radius()).max(0.0);
            let energy = source.weight(dir) * capture.spread(length) * capture.response(-dir);
            self.deposit(
                acc,
                stats,
                Arrival {
                    capture: capture_index,
                    energy,
                    delay: self.settings.delay(length),
                    order: 0,
                },
                floor,
            );
        }
    }

    fn trace_ray(
        &self,
        source_index: usize,
        dir: Vec3,
        acc: &mut Accumulator,
        stats: &mut PathStats,
    ) {
        stats.rays += 1;

        let source = &self.sources[source_index];
        let settings = self.settings;
        let tolerance = settings.tolerance;

        let initial = source.weight(dir) / (self.directions[source_index].len() as f32);
        if !(initial > 0.0) {
            return;
        }
        let floor = NEGLIGIBLE_FRACTION * settings.energy_threshold * initial;
        let cutoff = settings.energy_threshold * initial;

        let mut state = PathState {
            ray: Ray::new(source.emission_point(dir), dir, f32::INFINITY),
            energy: initial,
            length: 0.0,
            order: 0,
        };

        loop {
            if state.order >= settings.max_reflections {
                break;
            }
            let hit = match self.scene.intersect(&state.ray, tolerance) {
                Some(hit) => hit,
                // Escaped
                None => break,
            };
            stats.segments += 1;

            state.length += hit.t;
            if state.length > self.max_distance {
                break;
            }
            state.order += 1;

            let triangle = self.scene.triangle(hit.triangle);
            state.energy *= triangle.reflection;

            let reflected = math::reflect(state.ray.d, triangle.normal).normalize_or_zero();
            if reflected == Vec3::ZERO || !math::is_finite(reflected) {
                break;
            }
            // Normal on the side the path continues on
            let side = if reflected.dot(triangle.normal) >= 0.0 {
                triangle.normal
            } else {
                -triangle.normal
            };
            let origin = hit.point + side * tolerance;

            for (capture_index, capture) in self.captures.iter().enumerate() {
                if !self.table.accepts(capture_index, state.order) {
                    continue;
                }
                let to_capture = capture.position() - hit.point;
                // Captures behind the surface can't hear this reflection
                if to_capture.dot(side) <= 0.0 {
                    continue;
                }
                let dist = to_capture.length();
                if dist <= tolerance || self.scene.occluded(origin, capture.position(), tolerance)
                {
                    continue;
                }

                let total = state.length + dist;
                let energy =
                    state.energy * capture.spread(total) * capture.response(-to_capture / dist);
                self.deposit(
                    acc,
                    stats,
                    Arrival {
                        capture: capture_index,
                        energy,
                        delay: settings.delay(total),
                        order: state.order,
                    },
                    floor,
                );
            }

            // Arrivals of this bounce are already in, the path ends with them
            if state.energy < cutoff || !self.table.accepts_from(state.order + 1) {
                break;
            }

            state.ray = Ray::new(origin, reflected, f32::INFINITY);
        }
    }
}
