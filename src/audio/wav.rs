//! WAV container encoding and decoding
//!
//! Encoding writes a canonical 44-byte RIFF header followed by signed 16-bit
//! little-endian PCM. Decoding goes through `hound` and accepts 8/16/24/32-bit
//! integer or 32-bit float files with any channel count.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use std::str::FromStr;

use hound::{SampleFormat, WavReader};
use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::error::{SpliceError, Result};

pub const WAV_HEADER_SIZE: usize = 44;

const FMT_CHUNK_SIZE: u32 = 16;
const PCM_FORMAT_TAG: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;

/// How channels are written into the `data` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelLayout {
    /// Every channel, frame by frame (`L R L R ...`).
    #[default]
    Interleaved,
    /// Only channel 0 is written, while the header still reports every
    /// channel of the buffer. Matches files produced by older exports.
    FirstChannelOnly,
}

impl ChannelLayout {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelLayout::Interleaved => "interleaved",
            ChannelLayout::FirstChannelOnly => "first-channel-only",
        }
    }

    /// Number of channels actually present in the data chunk.
    pub fn written_channels(&self, buffer_channels: usize) -> usize {
        match self {
            ChannelLayout::Interleaved => buffer_channels,
            ChannelLayout::FirstChannelOnly => 1,
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelLayout {
    type Err = SpliceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interleaved" => Ok(ChannelLayout::Interleaved),
            "first-channel-only" | "first" | "mono" => Ok(ChannelLayout::FirstChannelOnly),
            other => Err(SpliceError::config(format!("Unknown channel layout: {}", other))),
        }
    }
}

/// Convert a float sample to signed 16-bit PCM.
///
/// The sample is clamped to [-1, 1], then negative values scale by 0x8000 and
/// non-negative values by 0x7FFF, truncating toward zero. NaN becomes silence.
pub fn sample_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }

    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// Inverse of [`sample_to_i16`], up to quantization.
pub fn i16_to_sample(sample: i16) -> f32 {
    if sample < 0 {
        sample as f32 / 32768.0
    } else {
        sample as f32 / 32767.0
    }
}

/// 16-bit PCM WAV encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoder {
    layout: ChannelLayout,
}

impl WavEncoder {
    pub fn new(layout: ChannelLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Size in bytes of the `data` chunk payload for `buffer`.
    pub fn data_size(&self, buffer: &AudioBuffer) -> usize {
        buffer.length() * self.layout.written_channels(buffer.num_channels()) * BYTES_PER_SAMPLE
    }

    pub fn encode(&self, buffer: &AudioBuffer) -> Result<Vec<u8>> {
        let channels = buffer.num_channels() as u16;
        let sample_rate = buffer.sample_rate();
        let data_size = self.data_size(buffer);

        let data_size_field = u32::try_from(data_size)
            .ok()
            .filter(|size| size.checked_add(36).is_some())
            .ok_or_else(|| SpliceError::audio(format!("Audio too long for a WAV container: {} data bytes", data_size)))?;

        let byte_rate = u32::try_from(sample_rate as u64 * channels as u64 * BYTES_PER_SAMPLE as u64)
            .map_err(|_| SpliceError::audio("Byte rate does not fit in a WAV header"))?;
        let block_align = channels
            .checked_mul(BYTES_PER_SAMPLE as u16)
            .ok_or_else(|| SpliceError::audio(format!("Too many channels for 16-bit WAV: {}", channels)))?;

        let mut wav = Vec::with_capacity(WAV_HEADER_SIZE + data_size);

        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_size_field).to_le_bytes());
        wav.extend_from_slice(b"WAVE");

        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
        wav.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
        wav.extend_from_slice(&channels.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_size_field.to_le_bytes());

        match self.layout {
            ChannelLayout::Interleaved => {
                for frame in buffer.frames() {
                    for &sample in frame.iter() {
                        wav.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
                    }
                }
            }
            ChannelLayout::FirstChannelOnly => {
                if let Some(channel) = buffer.channel(0) {
                    for &sample in channel.iter() {
                        wav.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
                    }
                }
            }
        }

        log::debug!(
            "Encoded WAV: {} channels, {} Hz, {} samples/channel, layout {}, {} bytes",
            channels, sample_rate, buffer.length(), self.layout, wav.len()
        );

        Ok(wav)
    }
}

/// Encode `buffer` with the default (interleaved) layout.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    WavEncoder::default().encode(buffer)
}

/// Decode an in-memory WAV file.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer> {
    let reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| SpliceError::audio(format!("Cannot create WAV reader: {}", e)))?;
    read_samples(reader)
}

/// Read and decode a WAV file from disk.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| SpliceError::audio(format!("Cannot open audio file {}: {}", path.display(), e)))?;

    let reader = WavReader::new(BufReader::new(file))
        .map_err(|e| SpliceError::audio(format!("Cannot create WAV reader for {}: {}", path.display(), e)))?;

    let buffer = read_samples(reader)?;
    log::info!(
        "Loaded {}: {} channels, {} Hz, {:.3}s",
        path.display(), buffer.num_channels(), buffer.sample_rate(), buffer.duration()
    );
    Ok(buffer)
}

/// Encode `buffer` and write it to `path`. Nothing is left behind on failure.
pub fn save_wav<P: AsRef<Path>>(buffer: &AudioBuffer, path: P, layout: ChannelLayout) -> Result<()> {
    let bytes = WavEncoder::new(layout).encode(buffer)?;
    crate::export::write_output(path, &bytes)
}

fn read_samples<R: Read>(mut reader: WavReader<R>) -> Result<AudioBuffer> {
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(SpliceError::audio("WAV file reports 0 channels"));
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|sample| sample.map(i16_to_sample))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, bits @ (8 | 24 | 32)) => {
            let full_scale = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / full_scale))
                .collect::<std::result::Result<_, _>>()?
        }
        (format, bits) => {
            return Err(SpliceError::audio(format!(
                "Unsupported WAV sample format: {:?} {}-bit", format, bits
            )));
        }
    };

    AudioBuffer::from_interleaved(&interleaved, spec.channels, spec.sample_rate)
}
