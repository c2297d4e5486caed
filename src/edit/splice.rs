//! Region splicing on decoded PCM buffers
//!
//! All operations read from the input buffer and build a new one. Region
//! bounds go through [`AudioBuffer::time_to_sample`], so a region that runs
//! past the end of the buffer is clamped instead of failing.

use std::fmt;
use std::ops::Range;

use ndarray::{Array2, s};

use crate::audio::AudioBuffer;
use crate::error::{SpliceError, Result};
use super::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOp {
    /// Keep only the region.
    Trim,
    /// Drop the region and join what is left.
    Remove,
}

impl SpliceOp {
    pub fn name(&self) -> &'static str {
        match self {
            SpliceOp::Trim => "trim",
            SpliceOp::Remove => "remove",
        }
    }
}

impl fmt::Display for SpliceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply `op` to `buffer`. Without a region the result is an unchanged copy.
pub fn apply(buffer: &AudioBuffer, op: SpliceOp, region: Option<&Region>) -> AudioBuffer {
    let Some(region) = region else {
        log::debug!("No region selected, {} skipped", op);
        return buffer.clone();
    };

    match op {
        SpliceOp::Trim => trim(buffer, region),
        SpliceOp::Remove => remove(buffer, region),
    }
}

/// Keep samples `[floor(start * rate), floor(end * rate))` of every channel.
pub fn trim(buffer: &AudioBuffer, region: &Region) -> AudioBuffer {
    let range = resolve(buffer, region);
    let samples = buffer.samples().slice(s![.., range.clone()]).to_owned();

    log::debug!("Trim {}: kept samples {}..{} of {}", region, range.start, range.end, buffer.length());
    buffer.with_samples(samples)
}

/// Drop samples `[floor(start * rate), floor(end * rate))` from every channel.
pub fn remove(buffer: &AudioBuffer, region: &Region) -> AudioBuffer {
    let range = resolve(buffer, region);
    let before_len = range.start;
    let after_len = buffer.length() - range.end;

    let mut samples = Array2::<f32>::zeros((buffer.num_channels(), before_len + after_len));
    for (mut output, input) in samples.outer_iter_mut().zip(buffer.channels()) {
        output.slice_mut(s![..before_len]).assign(&input.slice(s![..range.start]));
        output.slice_mut(s![before_len..]).assign(&input.slice(s![range.end..]));
    }

    log::debug!(
        "Remove {}: dropped samples {}..{}, {} remain",
        region, range.start, range.end, before_len + after_len
    );
    buffer.with_samples(samples)
}

/// Cut `buffer` in two at `at_seconds`. Either half may be empty; a negative
/// or non-finite split point is an error.
pub fn split(buffer: &AudioBuffer, at_seconds: f64) -> Result<(AudioBuffer, AudioBuffer)> {
    if !at_seconds.is_finite() || at_seconds < 0.0 {
        return Err(SpliceError::region(format!("Split point must be a non-negative time: {}", at_seconds)));
    }
    let at = buffer.time_to_sample(at_seconds);
    let view = buffer.samples();

    let before = buffer.with_samples(view.slice(s![.., ..at]).to_owned());
    let after = buffer.with_samples(view.slice(s![.., at..]).to_owned());

    log::debug!("Split at sample {}: {} + {}", at, before.length(), after.length());
    Ok((before, after))
}

fn resolve(buffer: &AudioBuffer, region: &Region) -> Range<usize> {
    if !region.fits(buffer) {
        log::warn!(
            "Region {} extends past the end of the audio ({:.3}s), clamping",
            region, buffer.duration()
        );
    }
    region.sample_range(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Channel `c` holds `c * 1000 + i` at index `i`, so leaks between channels show up.
    fn tagged_buffer(channels: usize, length: usize, sample_rate: u32) -> AudioBuffer {
        let data = (0..channels)
            .map(|c| (0..length).map(|i| (c * 1000 + i) as f32).collect())
            .collect();
        AudioBuffer::from_channels(data, sample_rate).unwrap()
    }

    fn floor_samples(seconds: f64, rate: u32) -> usize {
        (seconds * rate as f64).floor() as usize
    }

    #[test]
    fn test_two_second_stereo_scenario() {
        let buffer = AudioBuffer::silence(2, 88200, 44100).unwrap();
        let region = Region::new(0.5, 1.0).unwrap();

        let trimmed = trim(&buffer, &region);
        assert_eq!(trimmed.length(), 22050);
        assert_eq!(trimmed.num_channels(), 2);
        assert_eq!(trimmed.sample_rate(), 44100);

        let removed = remove(&buffer, &region);
        assert_eq!(removed.length(), 66150);
        assert_eq!(removed.num_channels(), 2);
        assert_eq!(removed.sample_rate(), 44100);
    }

    #[test]
    fn test_lengths_follow_floor_mapping() {
        let rate = 1000;
        let buffer = tagged_buffer(2, 3000, rate);
        let bounds = [(0.0, 0.0), (0.0, 1.2345), (0.0015, 0.0025), (1.9999, 3.0), (2.5, 2.5), (0.7777, 2.2222)];

        for (start, end) in bounds {
            let region = Region::new(start, end).unwrap();
            let selected = floor_samples(end, rate) - floor_samples(start, rate);

            assert_eq!(trim(&buffer, &region).length(), selected, "trim {}", region);
            assert_eq!(remove(&buffer, &region).length() + selected, buffer.length(), "remove {}", region);
        }
    }

    #[test]
    fn test_trim_contents() {
        let buffer = tagged_buffer(2, 10, 10);
        let trimmed = trim(&buffer, &Region::new(0.3, 0.6).unwrap());

        assert_eq!(trimmed.channel(0).unwrap().to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(trimmed.channel(1).unwrap().to_vec(), vec![1003.0, 1004.0, 1005.0]);
    }

    #[test]
    fn test_remove_keeps_channels_separate() {
        let buffer = tagged_buffer(3, 10, 10);
        let removed = remove(&buffer, &Region::new(0.2, 0.8).unwrap());

        assert_eq!(removed.channel(0).unwrap().to_vec(), vec![0.0, 1.0, 8.0, 9.0]);
        assert_eq!(removed.channel(1).unwrap().to_vec(), vec![1000.0, 1001.0, 1008.0, 1009.0]);
        assert_eq!(removed.channel(2).unwrap().to_vec(), vec![2000.0, 2001.0, 2008.0, 2009.0]);
    }

    #[test]
    fn test_remove_from_start() {
        let buffer = tagged_buffer(1, 10, 10);
        let removed = remove(&buffer, &Region::new(0.0, 0.4).unwrap());
        assert_eq!(removed.channel(0).unwrap().to_vec(), vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_remove_to_end() {
        let buffer = tagged_buffer(1, 10, 10);
        let removed = remove(&buffer, &Region::new(0.7, 1.0).unwrap());
        assert_eq!(removed.channel(0).unwrap().to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_remove_everything() {
        let buffer = tagged_buffer(2, 10, 10);
        let removed = remove(&buffer, &Region::new(0.0, 1.0).unwrap());
        assert!(removed.is_empty());
        assert_eq!(removed.num_channels(), 2);
    }

    #[test]
    fn test_repeated_remove_out_of_range() {
        let buffer = tagged_buffer(2, 100, 100);
        let region = Region::new(0.5, 0.9).unwrap();

        let once = remove(&buffer, &region);
        assert_eq!(once.length(), 60);

        // Region now ends past the shortened buffer.
        let twice = remove(&once, &region);
        assert_eq!(twice.length(), 50);

        let past_end = Region::new(0.8, 0.9).unwrap();
        let thrice = remove(&twice, &past_end);
        assert_eq!(thrice, twice);
        assert!(trim(&twice, &past_end).is_empty());
    }

    #[test]
    fn test_input_untouched() {
        let buffer = tagged_buffer(2, 10, 10);
        let copy = buffer.clone();
        let region = Region::new(0.2, 0.5).unwrap();

        let _ = trim(&buffer, &region);
        let _ = remove(&buffer, &region);
        let _ = split(&buffer, 0.5);
        assert_eq!(buffer, copy);
    }

    #[test]
    fn test_apply_without_region() {
        let buffer = tagged_buffer(2, 10, 10);
        assert_eq!(apply(&buffer, SpliceOp::Trim, None), buffer);
        assert_eq!(apply(&buffer, SpliceOp::Remove, None), buffer);

        let region = Region::new(0.0, 0.5).unwrap();
        assert_eq!(apply(&buffer, SpliceOp::Trim, Some(&region)).length(), 5);
    }

    #[test]
    fn test_split() {
        let buffer = tagged_buffer(2, 10, 10);
        let (before, after) = split(&buffer, 0.4).unwrap();

        assert_eq!(before.length(), 4);
        assert_eq!(after.length(), 6);
        assert_eq!(after.channel(1).unwrap()[0], 1004.0);

        let (head, tail) = split(&buffer, 5.0).unwrap();
        assert_eq!(head.length(), 10);
        assert!(tail.is_empty());

        assert!(matches!(split(&buffer, -0.1), Err(SpliceError::Region { .. })));
    }
}
