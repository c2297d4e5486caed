//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum SpliceError {
    #[error("Audio error: {message}")]
    Audio { message: String },
    #[error("Region error: {message}")]
    Region { message: String },
    #[error("Unsupported export format: {format}")]
    UnsupportedFormat { format: String },
    #[error("Recording error: {message}")]
    Recording { message: String },
    #[error("Transcoder error: {message}")]
    Transcoder { message: String },
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("IO error: {message}")]
    Io { message: String },
}

impl SpliceError {
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn region<S: Into<String>>(msg: S) -> Self { Self::Region { message: msg.into() } }
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self { Self::UnsupportedFormat { format: format.into() } }
    pub fn recording<S: Into<String>>(msg: S) -> Self { Self::Recording { message: msg.into() } }
    pub fn transcoder<S: Into<String>>(msg: S) -> Self { Self::Transcoder { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, SpliceError>;

impl From<std::io::Error> for SpliceError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<hound::Error> for SpliceError {
    fn from(err: hound::Error) -> Self { Self::audio(format!("WAV: {}", err)) }
}
