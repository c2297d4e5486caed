//! Microphone capture into an [`AudioBuffer`]

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SizedSample};

use crate::audio::AudioBuffer;
use crate::error::{SpliceError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    NotRecording,
    Recording,
}

struct ActiveRecording {
    stream: cpal::Stream,
    samples: Arc<Mutex<Vec<f32>>>,
    channels: u16,
    sample_rate: u32,
}

/// Records from an input device until [`Recorder::stop`] is called.
///
/// A failed [`Recorder::start`] (no device, permission denied, unsupported
/// config) is reported as [`SpliceError::Recording`] and leaves the recorder
/// in [`RecordingState::NotRecording`], ready for another attempt.
pub struct Recorder {
    device_name: Option<String>,
    active: Option<ActiveRecording>,
}

impl Recorder {
    /// Record from the host's default input device.
    pub fn new() -> Self {
        Self { device_name: None, active: None }
    }

    /// Record from the input device with this exact name.
    pub fn with_device<S: Into<String>>(name: S) -> Self {
        Self { device_name: Some(name.into()), active: None }
    }

    pub fn state(&self) -> RecordingState {
        if self.active.is_some() {
            RecordingState::Recording
        } else {
            RecordingState::NotRecording
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state() == RecordingState::Recording
    }

    pub fn start(&mut self) -> Result<()> {
        if self.is_recording() {
            return Err(SpliceError::recording("Already recording"));
        }

        let device = self.find_device()?;
        let supported = device
            .default_input_config()
            .map_err(|e| SpliceError::recording(format!("Cannot query input config: {}", e)))?;

        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let samples = Arc::new(Mutex::new(Vec::new()));

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&samples))?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&samples))?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&samples))?,
            cpal::SampleFormat::I32 => build_stream::<i32>(&device, &config, Arc::clone(&samples))?,
            other => {
                return Err(SpliceError::recording(format!("Unsupported input sample format: {:?}", other)));
            }
        };

        stream
            .play()
            .map_err(|e| SpliceError::recording(format!("Cannot start input stream: {}", e)))?;

        log::info!(
            "Recording from {}: {} channels, {} Hz",
            device.name().unwrap_or_else(|_| "unknown device".to_string()),
            config.channels, config.sample_rate.0
        );

        self.active = Some(ActiveRecording {
            stream,
            samples,
            channels: config.channels,
            sample_rate: config.sample_rate.0,
        });
        Ok(())
    }

    /// Stop capturing and return everything recorded since [`Recorder::start`].
    pub fn stop(&mut self) -> Result<AudioBuffer> {
        let active = self
            .active
            .take()
            .ok_or_else(|| SpliceError::recording("Not recording"))?;

        if let Err(e) = active.stream.pause() {
            log::warn!("Cannot pause input stream: {}", e);
        }
        drop(active.stream);

        let mut interleaved = active
            .samples
            .lock()
            .map(|mut samples| std::mem::take(&mut *samples))
            .map_err(|_| SpliceError::recording("Capture buffer poisoned"))?;

        let channels = active.channels.max(1) as usize;
        interleaved.truncate(interleaved.len() - interleaved.len() % channels);

        let buffer = AudioBuffer::from_interleaved(&interleaved, active.channels, active.sample_rate)?;
        log::info!("Recording stopped: {:.3}s captured", buffer.duration());
        Ok(buffer)
    }

    fn find_device(&self) -> Result<cpal::Device> {
        let host = cpal::default_host();

        match &self.device_name {
            None => host
                .default_input_device()
                .ok_or_else(|| SpliceError::recording("No input device available")),
            Some(name) => host
                .input_devices()
                .map_err(|e| SpliceError::recording(format!("Cannot list input devices: {}", e)))?
                .find(|device| device.name().map(|n| &n == name).unwrap_or(false))
                .ok_or_else(|| SpliceError::recording(format!("Input device not found: {}", name))),
        }
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_stream<T>(device: &cpal::Device, config: &cpal::StreamConfig, sink: Arc<Mutex<Vec<f32>>>) -> Result<cpal::Stream>
where
    T: SizedSample,
    f32: cpal::FromSample<T>,
{
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if let Ok(mut samples) = sink.lock() {
                    samples.extend(data.iter().map(|&s| s.to_sample::<f32>()));
                }
            },
            |err| log::error!("Input stream error: {}", err),
            None,
        )
        .map_err(|e| SpliceError::recording(format!("Cannot open input stream: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recorder_is_idle() {
        let recorder = Recorder::default();
        assert_eq!(recorder.state(), RecordingState::NotRecording);
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_failed_start_stays_not_recording() {
        let mut recorder = Recorder::with_device("wavesplice-missing-input-device");

        let result = recorder.start();
        assert!(matches!(result, Err(SpliceError::Recording { .. })));
        assert_eq!(recorder.state(), RecordingState::NotRecording);

        // Still usable after the failure.
        assert!(matches!(recorder.start(), Err(SpliceError::Recording { .. })));
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_stop_without_start() {
        let mut recorder = Recorder::with_device("wavesplice-missing-input-device");
        assert!(matches!(recorder.stop(), Err(SpliceError::Recording { .. })));
    }
}
