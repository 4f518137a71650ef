//! Per-worker accumulation of arrivals and the merge into the bound buffers.
//!
//! Workers never touch the shared buffers. Each one deposits into private
//! partial buffers, one per distinct (buffer, channel) target. Once every worker
//! is done the partials are added into the targets in ascending worker order,
//! which keeps the summation order independent of scheduling.

use std::sync::{Arc, MutexGuard};

use crate::{
    binding::{Binding, OrderRange},
    dsp::Backend,
    error::{Error, Result},
    sample::{self, SampleBuffer, SharedBuffer},
};

/// A single contribution of a traced path to a capture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arrival {
    pub capture: usize,
    pub energy: f32,
    /// Fractional delay in samples.
    pub delay: f32,
    pub order: u32,
}

struct Target {
    buffer: SharedBuffer,
    channel: usize,
    length: usize,
}

/// Bindings resolved into distinct targets, read-only while tracing.
pub struct BindingTable {
    targets: Vec<Target>,
    // Per capture, the ranges and the target indices they route to
    routes: Vec<Vec<(OrderRange, usize)>>,
}

impl BindingTable {
    /// Resolves `bindings` for `capture_count` captures.
    pub fn new(bindings: &[Binding], capture_count: usize) -> Result<Self> {
        let mut targets: Vec<Target> = Vec::new();
        let mut routes = vec![Vec::new(); capture_count];
        for b in bindings {
            if b.capture >= capture_count {
                return Err(Error::InvalidArgument(format!(
                    "Binding references capture {} but there are only {}",
                    b.capture, capture_count
                )));
            }
            let index = match targets
                .iter()
                .position(|t| Arc::ptr_eq(&t.buffer, &b.buffer) && t.channel == b.channel)
            {
                Some(i) => i,
                None => {
                    let (channels, length) = {
                        let buffer = lock(&b.buffer)?;
                        (buffer.channel_count(), buffer.length())
                    };
                    if b.channel >= channels {
                        return Err(Error::InvalidArgument(format!(
                            "Channel {} out of range for a {} channel buffer",
                            b.channel, channels
                        )));
                    }
                    targets.push(Target {
                        buffer: Arc::clone(&b.buffer),
                        channel: b.channel,
                        length,
                    });
                    targets.len() - 1
                }
            };
            routes[b.capture].push((b.range, index));
        }
        Ok(Self { targets, routes })
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Returns the length of the longest target in samples.
    pub fn max_length(&self) -> usize {
        self.targets.iter().map(|t| t.length).max().unwrap_or(0)
    }

    /// Returns `true` if any binding of `capture` accepts `order`.
    pub fn accepts(&self, capture: usize, order: u32) -> bool {
        self.routes
            .get(capture)
            .map_or(false, |r| r.iter().any(|(range, _)| range.contains(order)))
    }

    /// Returns `true` if any binding accepts arrivals of `order` or higher.
    pub fn accepts_from(&self, order: u32) -> bool {
        self.routes.iter().flatten().any(|(range, _)| {
            range.max.map_or(true, |max| max >= order)
        })
    }
}

/// Private deposit target of a single worker.
pub struct Accumulator {
    partials: Vec<Vec<f32>>,
    pub deposited: usize,
    pub dropped: usize,
}

impl Accumulator {
    pub fn new(table: &BindingTable) -> Result<Self> {
        let mut partials = Vec::new();
        partials.try_reserve_exact(table.targets.len())?;
        for t in &table.targets {
            let mut partial = Vec::new();
            partial.try_reserve_exact(t.length)?;
            partial.resize(t.length, 0.0);
            partials.push(partial);
        }
        Ok(Self {
            partials,
            deposited: 0,
            dropped: 0,
        })
    }

    /// Deposits `arrival` into every target whose range contains its order.
    pub fn add(&mut self, table: &BindingTable, arrival: &Arrival) {
        let routes = match table.routes.get(arrival.capture) {
            Some(routes) => routes,
            None => return,
        };
        for &(range, target) in routes {
            if range.contains(arrival.order) {
                if sample::deposit(&mut self.partials[target], arrival.delay, arrival.energy) {
                    self.deposited += 1;
                } else {
                    self.dropped += 1;
                }
            }
        }
    }
}

fn lock(buffer: &SharedBuffer) -> Result<MutexGuard<'_, SampleBuffer>> {
    buffer
        .lock()
        .map_err(|_| Error::Resource("Sample buffer lock is poisoned".into()))
}

/// Adds the partials of `accumulators` into the bound buffers, scaled by
/// `energy_scale`, and stamps `sample_rate` on them.
///
/// Every buffer is locked before the first write so either all targets are
/// updated or none are.
pub fn merge(
    table: &BindingTable,
    accumulators: &[Accumulator],
    energy_scale: f32,
    sample_rate: u32,
    backend: &Backend,
) -> Result<()> {
    // Distinct buffers and the targets living in them
    let mut buffers: Vec<(&SharedBuffer, Vec<usize>)> = Vec::new();
    for (i, t) in table.targets.iter().enumerate() {
        match buffers.iter_mut().find(|(b, _)| Arc::ptr_eq(b, &t.buffer)) {
            Some((_, targets)) => targets.push(i),
            None => buffers.push((&t.buffer, vec![i])),
        }
    }

    let mut guards = Vec::with_capacity(buffers.len());
    for (buffer, _) in &buffers {
        guards.push(lock(buffer)?);
    }
    for ((_, targets), guard) in buffers.iter().zip(guards.iter()) {
        for &i in targets {
            let t = &table.targets[i];
            if guard.channel_count() <= t.channel || guard.length() != t.length {
                return Err(Error::InvalidArgument(
                    "Bound buffer changed shape during processing".into(),
                ));
            }
        }
    }

    for ((_, targets), guard) in buffers.iter().zip(guards.iter_mut()) {
        for &i in targets {
            // Checked above
            if let Some(channel) = guard.channel_mut(table.targets[i].channel) {
                for acc in accumulators {
                    if energy_scale == 1.0 {
                        (backend.add2)(channel, &acc.partials[i]);
                    } else {
                        (backend.fmadd_k3)(channel, &acc.partials[i], energy_scale);
                    }
                }
            }
        }
        guard.set_sample_rate(sample_rate);
    }

    log::trace!(
        "Accumulator: Merged {} workers into {} targets",
        accumulators.len(),
        table.targets.len()
    );

    Ok(())
}
