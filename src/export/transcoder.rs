//! External transcoding of WAV intermediates

use std::path::{Path, PathBuf};
use std::process::Command;

use super::ExportFormat;
use crate::config::ExportConfig;
use crate::error::{SpliceError, Result};

/// Converts a complete WAV byte stream into another container.
///
/// Implementations either return the whole encoded file or an error; partial
/// output is never returned.
pub trait Transcoder {
    fn transcode(&self, wav: &[u8], format: ExportFormat) -> Result<Vec<u8>>;
}

/// Runs the `ffmpeg` executable on a scratch directory.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    mp3_bitrate_kbps: u32,
}

impl FfmpegTranscoder {
    pub fn new<P: Into<PathBuf>>(program: P, mp3_bitrate_kbps: u32) -> Self {
        Self {
            program: program.into(),
            mp3_bitrate_kbps,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        let program = config.ffmpeg_path.clone().unwrap_or_else(|| PathBuf::from("ffmpeg"));
        Self::new(program, config.mp3_bitrate_kbps)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn codec_args(&self, format: ExportFormat) -> Result<Vec<String>> {
        match format {
            ExportFormat::Mp3 => Ok(vec![
                "-c:a".to_string(),
                "libmp3lame".to_string(),
                "-b:a".to_string(),
                format!("{}k", self.mp3_bitrate_kbps),
            ]),
            ExportFormat::Aac => Ok(vec!["-c:a".to_string(), "aac".to_string()]),
            ExportFormat::Wav => Err(SpliceError::transcoder("WAV output does not need transcoding")),
        }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, wav: &[u8], format: ExportFormat) -> Result<Vec<u8>> {
        let codec_args = self.codec_args(format)?;

        let scratch = tempfile::tempdir()
            .map_err(|e| SpliceError::transcoder(format!("Cannot create scratch directory: {}", e)))?;
        let input = scratch.path().join("input.wav");
        let output = scratch.path().join(format!("output.{}", format.extension()));

        std::fs::write(&input, wav)
            .map_err(|e| SpliceError::transcoder(format!("Cannot stage WAV input: {}", e)))?;

        log::debug!("Running {} for {} output", self.program.display(), format);
        let result = Command::new(&self.program)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(&input)
            .args(&codec_args)
            .arg(&output)
            .output()
            .map_err(|e| SpliceError::transcoder(format!("Cannot run {}: {}", self.program.display(), e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(SpliceError::transcoder(format!(
                "{} exited with {}: {}",
                self.program.display(), result.status, stderr.trim()
            )));
        }

        std::fs::read(&output)
            .map_err(|e| SpliceError::transcoder(format!("Cannot read {} output: {}", format, e)))
    }
}
