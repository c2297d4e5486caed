//! Time regions on a buffer's timeline

use std::fmt;
use std::ops::Range;

use crate::audio::AudioBuffer;
use crate::error::{SpliceError, Result};

/// A selected interval in seconds, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    start: f64,
    end: f64,
}

impl Region {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SpliceError::region(format!("Region bounds must be finite: {} - {}", start, end)));
        }

        if start < 0.0 {
            return Err(SpliceError::region(format!("Region start cannot be negative: {}", start)));
        }

        if end < start {
            return Err(SpliceError::region(format!("Region end {} is before start {}", end, start)));
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the region lies entirely within `buffer`.
    pub fn fits(&self, buffer: &AudioBuffer) -> bool {
        self.end <= buffer.duration()
    }

    /// Sample offsets `[floor(start * rate), floor(end * rate))`, clamped to the buffer.
    pub fn sample_range(&self, buffer: &AudioBuffer) -> Range<usize> {
        let start = buffer.time_to_sample(self.start);
        let end = buffer.time_to_sample(self.end).max(start);
        start..end
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s-{:.3}s", self.start, self.end)
    }
}
