//! Audio Buffer and WAV Module
//!
//! Provides the decoded PCM buffer type, WAV encoding/decoding, the
//! float/int16 sample conversions shared by both, and microphone capture.

pub mod buffer;
pub mod recorder;
pub mod wav;

pub use buffer::AudioBuffer;
pub use recorder::{Recorder, RecordingState};
pub use wav::{ChannelLayout, WavEncoder, decode_wav, encode_wav, read_wav, save_wav};
