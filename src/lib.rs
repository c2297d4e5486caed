//! wavesplice - region editing and export for recorded audio
//!
//! Splices regions out of decoded multi-channel PCM buffers and encodes the
//! result as 16-bit WAV, or as MP3/AAC through an external transcoder.

pub mod audio;
pub mod config;
pub mod edit;
pub mod error;
pub mod export;

pub use audio::{AudioBuffer, ChannelLayout, WavEncoder, encode_wav};
pub use config::{Args, Config};
pub use edit::{Region, Selection, SpliceOp};
pub use error::{SpliceError, Result};
pub use export::{ExportFormat, Exporter, FfmpegTranscoder, Transcoder};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

pub fn init_logging(verbose: bool) {
    unsafe {
        std::env::set_var("RUST_LOG", if verbose { "debug" } else { "info" });
    }
    env_logger::Builder::from_env("RUST_LOG")
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
