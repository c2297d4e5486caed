//! Decoded multi-channel PCM buffer

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use crate::error::{SpliceError, Result};

/// Per-channel f32 samples sharing one sample rate.
///
/// Samples are stored as a `(channels, length)` array, so every row is one
/// channel. Buffers are never mutated after construction; editing operations
/// build a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Array2<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Array2<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SpliceError::audio("Sample rate cannot be 0"));
        }

        if samples.nrows() == 0 {
            return Err(SpliceError::audio("Audio buffer needs at least one channel"));
        }

        if samples.nrows() > u16::MAX as usize {
            return Err(SpliceError::audio(
                format!("Too many channels: {}", samples.nrows())
            ));
        }

        Ok(Self { samples, sample_rate })
    }

    /// Build a buffer from one `Vec` per channel. All channels must be equally long.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        let num_channels = channels.len();
        let length = channels.first().map(Vec::len).unwrap_or(0);

        if let Some((index, channel)) = channels.iter().enumerate().find(|(_, c)| c.len() != length) {
            return Err(SpliceError::audio(format!(
                "Channel length mismatch: channel 0 has {} samples, channel {} has {}",
                length, index, channel.len()
            )));
        }

        let flat: Vec<f32> = channels.into_iter().flatten().collect();
        let samples = Array2::from_shape_vec((num_channels, length), flat)
            .map_err(|e| SpliceError::audio(format!("Invalid channel layout: {}", e)))?;

        Self::new(samples, sample_rate)
    }

    /// Build a buffer from frame-interleaved samples (`L R L R ...`).
    pub fn from_interleaved(interleaved: &[f32], channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(SpliceError::audio("Channel count cannot be 0"));
        }

        let channels = channels as usize;
        if interleaved.len() % channels != 0 {
            return Err(SpliceError::audio(format!(
                "Interleaved sample count {} is not a multiple of {} channels",
                interleaved.len(), channels
            )));
        }

        let length = interleaved.len() / channels;
        let samples = Array2::from_shape_fn((channels, length), |(ch, i)| interleaved[i * channels + ch]);
        Self::new(samples, sample_rate)
    }

    pub fn silence(channels: u16, length: usize, sample_rate: u32) -> Result<Self> {
        Self::new(Array2::zeros((channels as usize, length)), sample_rate)
    }

    /// New buffer at the same sample rate. The channel count must not change.
    pub(crate) fn with_samples(&self, samples: Array2<f32>) -> Self {
        debug_assert_eq!(samples.nrows(), self.num_channels());
        Self { samples, sample_rate: self.sample_rate }
    }

    pub fn num_channels(&self) -> usize {
        self.samples.nrows()
    }

    /// Samples per channel.
    pub fn length(&self) -> usize {
        self.samples.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.length() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.num_channels()).then(|| self.samples.row(index))
    }

    pub fn channels(&self) -> impl Iterator<Item = ArrayView1<'_, f32>> {
        self.samples.outer_iter()
    }

    /// One view per frame, holding that instant's sample of every channel.
    pub fn frames(&self) -> impl Iterator<Item = ArrayView1<'_, f32>> {
        self.samples.axis_iter(Axis(1))
    }

    pub fn samples(&self) -> ArrayView2<'_, f32> {
        self.samples.view()
    }

    /// Map a time in seconds to a sample offset: `floor(seconds * sample_rate)`,
    /// clamped to `[0, length]`.
    ///
    /// Every splice operation goes through this mapping so that adjacent
    /// edits meet at the same sample.
    pub fn time_to_sample(&self, seconds: f64) -> usize {
        if !(seconds > 0.0) {
            return 0;
        }

        let index = (seconds * self.sample_rate as f64).floor();
        if index >= self.length() as f64 {
            self.length()
        } else {
            index as usize
        }
    }
}
