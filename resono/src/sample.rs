//! Multi-channel output buffers.

use std::sync::{Arc, Mutex};

/// Buffer shared between the caller and the engine.
pub type SharedBuffer = Arc<Mutex<SampleBuffer>>;

/// Fixed-length multi-channel time series. The engine only ever adds to it.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    length: usize,
    sample_rate: Option<u32>,
}

impl SampleBuffer {
    pub fn new(channels: usize, length: usize) -> Self {
        Self {
            channels: vec![vec![0.0; length]; channels],
            length,
            sample_rate: None,
        }
    }

    /// Creates a new buffer wrapped for binding.
    pub fn shared(channels: usize, length: usize) -> SharedBuffer {
        Arc::new(Mutex::new(Self::new(channels, length)))
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Returns the number of samples in each channel.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the sample rate of the last pass that wrote into this buffer.
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = Some(sample_rate);
    }

    pub fn channel(&self, channel: usize) -> Option<&[f32]> {
        self.channels.get(channel).map(|c| c.as_slice())
    }

    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(channel).map(|c| c.as_mut_slice())
    }

    /// Zeroes all channels.
    pub fn clear(&mut self) {
        for c in &mut self.channels {
            c.fill(0.0);
        }
    }

    /// Returns the sum of the samples in `channel`.
    pub fn total(&self, channel: usize) -> f64 {
        self.channel(channel)
            .map_or(0.0, |c| c.iter().map(|&s| s as f64).sum())
    }
}

/// Adds `energy` at fractional sample `delay`, split linearly between the two
/// neighbouring samples. Returns `false` if it falls outside of `buffer`.
///
/// A delay inside the last sample still counts as deposited, the share that
/// would land past the end is lost.
pub fn deposit(buffer: &mut [f32], delay: f32, energy: f32) -> bool {
    if !(delay >= 0.0) || !energy.is_finite() {
        return false;
    }
    let i = delay.floor();
    if i >= buffer.len() as f32 {
        return false;
    }
    let i = i as usize;
    let frac = delay - i as f32;
    buffer[i] += energy * (1.0 - frac);
    if let Some(next) = buffer.get_mut(i + 1) {
        *next += energy * frac;
    }
    true
}
