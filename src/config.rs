//! Configuration management for editing and export

use crate::audio::ChannelLayout;
use crate::error::{SpliceError, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// MP3 bitrates (kbps) accepted by the LAME encoder for MPEG-1 Layer III.
pub const MP3_BITRATES: [u32; 14] = [32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub verbose: bool,
    pub wav: WavConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WavConfig {
    pub layout: ChannelLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub mp3_bitrate_kbps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mp3_bitrate_kbps: 128,
            ffmpeg_path: None,
        }
    }
}

impl Config {
    pub fn layout(&self) -> ChannelLayout {
        self.wav.layout
    }

    pub fn mp3_bitrate_kbps(&self) -> u32 {
        self.export.mp3_bitrate_kbps
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "wavesplice", about = "Trim, cut and export recorded audio", version, author)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short = 'v', long = "verbose", global = true, help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'c', long = "config", global = true, help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "layout", global = true, help = "WAV channel layout: interleaved or first-channel-only")]
    pub layout: Option<ChannelLayout>,

    #[arg(long = "bitrate", global = true, help = "MP3 bitrate in kbps")]
    pub bitrate: Option<u32>,

    #[arg(long = "ffmpeg", global = true, help = "Path to the ffmpeg executable used for MP3/AAC")]
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show channel count, sample rate and duration of a WAV file
    Info {
        #[arg(short = 'i', long = "input", help = "Input audio file path (WAV format)")]
        input: PathBuf,
    },
    /// Keep only the selected region
    Trim(SpliceArgs),
    /// Delete the selected region
    Remove(SpliceArgs),
    /// Cut the audio in two at a time position
    Split {
        #[arg(short = 'i', long = "input", help = "Input audio file path (WAV format)")]
        input: PathBuf,

        #[arg(long = "at", allow_negative_numbers = true, help = "Split position in seconds")]
        at: f64,

        #[arg(short = 'o', long = "output", help = "Output path for the part before the split")]
        output: PathBuf,

        #[arg(long = "after-output", help = "Output path for the part after the split")]
        after_output: PathBuf,

        #[arg(short = 'f', long = "format", help = "Output format for both parts (wav, mp3, aac); defaults to each output's extension")]
        format: Option<String>,
    },
    /// Record from the microphone for a fixed time
    Record {
        #[arg(short = 'o', long = "output", help = "Output audio file path")]
        output: PathBuf,

        #[arg(long = "seconds", help = "Recording length in seconds")]
        seconds: f64,

        #[arg(short = 'd', long = "device", help = "Input device name; defaults to the system input")]
        device: Option<String>,

        #[arg(short = 'f', long = "format", help = "Output format (wav, mp3, aac); defaults to the output extension")]
        format: Option<String>,
    },
    /// Convert a WAV file to wav, mp3 or aac
    Export {
        #[arg(short = 'i', long = "input", help = "Input audio file path (WAV format)")]
        input: PathBuf,

        #[arg(short = 'o', long = "output", help = "Output audio file path")]
        output: PathBuf,

        #[arg(short = 'f', long = "format", help = "Output format (wav, mp3, aac); defaults to the output extension")]
        format: Option<String>,
    },
    /// Write a config file holding the default settings
    InitConfig {
        #[arg(default_value = "wavesplice.toml", help = "Where to write the config file")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct SpliceArgs {
    #[arg(short = 'i', long = "input", help = "Input audio file path (WAV format)")]
    pub input: PathBuf,

    #[arg(short = 'o', long = "output", help = "Output audio file path")]
    pub output: PathBuf,

    #[arg(short = 's', long = "start", allow_negative_numbers = true, help = "Region start in seconds")]
    pub start: Option<f64>,

    #[arg(short = 'e', long = "end", allow_negative_numbers = true, help = "Region end in seconds")]
    pub end: Option<f64>,

    #[arg(short = 'f', long = "format", help = "Output format (wav, mp3, aac); defaults to the output extension")]
    pub format: Option<String>,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: &Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(layout) = args.layout {
            config.wav.layout = layout;
        }
        if let Some(bitrate) = args.bitrate {
            config.export.mp3_bitrate_kbps = bitrate;
        }
        if let Some(ffmpeg) = &args.ffmpeg {
            config.export.ffmpeg_path = Some(ffmpeg.clone());
        }
        config.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpliceError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SpliceError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        if !MP3_BITRATES.contains(&self.export.mp3_bitrate_kbps) {
            return Err(SpliceError::config(format!(
                "MP3 bitrate must be one of {:?} kbps, got {}",
                MP3_BITRATES, self.export.mp3_bitrate_kbps
            )));
        }

        if let Some(path) = &self.export.ffmpeg_path {
            if path.as_os_str().is_empty() {
                return Err(SpliceError::config("ffmpeg path cannot be empty"));
            }
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SpliceError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SpliceError::config(format!("Failed to write config file: {}", e)))
    }

    /// Create default config file
    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout(), ChannelLayout::Interleaved);
        assert_eq!(config.mp3_bitrate_kbps(), 128);
        assert!(config.export.ffmpeg_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.export.mp3_bitrate_kbps = 100;
        assert!(config.validate().is_err());
        config.export.mp3_bitrate_kbps = 320;
        assert!(config.validate().is_ok());

        config.export.ffmpeg_path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.wav.layout = ChannelLayout::FirstChannelOnly;
        config.export.mp3_bitrate_kbps = 192;

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded.layout(), ChannelLayout::FirstChannelOnly);
        assert_eq!(loaded.mp3_bitrate_kbps(), 192);
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[wav]\nlayout = \"first-channel-only\"\n").unwrap();

        let loaded = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded.layout(), ChannelLayout::FirstChannelOnly);
        assert_eq!(loaded.mp3_bitrate_kbps(), 128);
    }

    #[test]
    fn test_args_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[export]\nmp3_bitrate_kbps = 96\n").unwrap();

        let config_arg = config_path.to_str().unwrap();
        let args = parse(&["wavesplice", "-c", config_arg, "info", "-i", "in.wav"]);
        assert_eq!(Config::from_args_and_config(&args).unwrap().mp3_bitrate_kbps(), 96);

        let args = parse(&["wavesplice", "-c", config_arg, "--bitrate", "256", "--layout", "first-channel-only", "info", "-i", "in.wav"]);
        let config = Config::from_args_and_config(&args).unwrap();
        assert_eq!(config.mp3_bitrate_kbps(), 256);
        assert_eq!(config.layout(), ChannelLayout::FirstChannelOnly);
    }

    #[test]
    fn test_parse_splice_command() {
        let args = parse(&["wavesplice", "trim", "-i", "in.wav", "-o", "out.wav", "--start", "0.5", "--end", "1.0"]);
        match args.command {
            Commands::Trim(splice) => {
                assert_eq!(splice.start, Some(0.5));
                assert_eq!(splice.end, Some(1.0));
                assert!(splice.format.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_layout_rejected() {
        assert!(Args::try_parse_from(["wavesplice", "--layout", "surround", "info", "-i", "a.wav"]).is_err());
    }
}
