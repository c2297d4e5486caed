//! Export Module
//!
//! Turns an edited [`AudioBuffer`] into WAV, MP3 or AAC bytes and writes them
//! out. WAV is encoded in-process; MP3 and AAC go through a [`Transcoder`]
//! fed with a WAV intermediate.

pub mod transcoder;

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::audio::{AudioBuffer, ChannelLayout, WavEncoder};
use crate::error::{SpliceError, Result};

pub use transcoder::{FfmpegTranscoder, Transcoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Wav,
    Mp3,
    Aac,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Wav, ExportFormat::Mp3, ExportFormat::Aac];

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Wav => "wav",
            ExportFormat::Mp3 => "mp3",
            ExportFormat::Aac => "aac",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.name()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Wav => "audio/wav",
            ExportFormat::Mp3 => "audio/mpeg",
            ExportFormat::Aac => "audio/aac",
        }
    }

    /// Whether this format needs an external transcoder.
    pub fn needs_transcoder(&self) -> bool {
        !matches!(self, ExportFormat::Wav)
    }

    /// Pick the format for `path`: an explicit name wins, then the file
    /// extension, then WAV.
    pub fn resolve(explicit: Option<&str>, path: &Path) -> Result<Self> {
        if let Some(name) = explicit {
            return name.parse();
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => ext.parse(),
            None => Ok(ExportFormat::Wav),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = SpliceError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| SpliceError::unsupported_format(s))
    }
}

/// Encodes buffers into any [`ExportFormat`].
pub struct Exporter {
    encoder: WavEncoder,
    transcoder: Box<dyn Transcoder>,
}

impl Exporter {
    pub fn new(layout: ChannelLayout, transcoder: Box<dyn Transcoder>) -> Self {
        Self {
            encoder: WavEncoder::new(layout),
            transcoder,
        }
    }

    pub fn export(&self, buffer: &AudioBuffer, format: ExportFormat) -> Result<Vec<u8>> {
        if !format.needs_transcoder() {
            return self.encoder.encode(buffer);
        }

        // The transcoder has to see every channel its header announces.
        let intermediate = WavEncoder::new(ChannelLayout::Interleaved).encode(buffer)?;
        log::info!("Transcoding {} bytes of WAV to {}", intermediate.len(), format);

        let encoded = self.transcoder.transcode(&intermediate, format)?;
        if encoded.is_empty() {
            return Err(SpliceError::transcoder(format!("{} transcoder produced no output", format)));
        }
        Ok(encoded)
    }

    /// Export and write to `path`. On any failure no file is created.
    pub fn export_to_file<P: AsRef<Path>>(&self, buffer: &AudioBuffer, format: ExportFormat, path: P) -> Result<usize> {
        let bytes = self.export(buffer, format)?;
        write_output(path, &bytes)?;
        Ok(bytes.len())
    }
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so readers never observe a partially written file.
pub fn write_output<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(dir)
        .map_err(|e| SpliceError::io(format!("Cannot create output directory {}: {}", dir.display(), e)))?;

    let mut file = NamedTempFile::new_in(dir)
        .map_err(|e| SpliceError::io(format!("Cannot create temporary file in {}: {}", dir.display(), e)))?;
    file.write_all(bytes)?;
    file.flush()?;

    file.persist(path)
        .map_err(|e| SpliceError::io(format!("Cannot write {}: {}", path.display(), e.error)))?;

    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
