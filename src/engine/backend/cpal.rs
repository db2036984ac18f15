//! CPAL-based audio backend for desktop platforms (Linux, macOS, Windows)
//!
//! Opens the default output device and renders the oscillator bank straight
//! into the device callback. The bank is moved into the callback closure,
//! so the audio thread owns it exclusively and never locks. Elapsed audio
//! is measured in completed callbacks (see `callback_clock`).

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::config::SynthConfig;
use crate::error::AudioError;
use crate::synth::{OscillatorBank, ParameterReceiver};

use super::callback_clock::{CallbackClock, CallbackRenderer, DEFAULT_STALL_TIMEOUT};
use super::AudioBackend;

/// Real-time output through the default CPAL device
pub struct CpalBackend {
    stream: Option<cpal::Stream>,
    clock: Option<CallbackClock>,
}

impl CpalBackend {
    pub fn new() -> Self {
        Self {
            stream: None,
            clock: None,
        }
    }

    /// Frames written to the device since start
    pub fn frames_rendered(&self) -> u64 {
        self.clock.as_ref().map_or(0, CallbackClock::frames)
    }

    fn create_output_stream(
        &mut self,
        config: &SynthConfig,
        receiver: ParameterReceiver,
    ) -> Result<cpal::Stream, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::StreamOpenFailed {
                reason: "No default output device found".to_string(),
            })?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::StreamOpenFailed {
                reason: format!("Failed to get default output config: {:?}", e),
            })?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::UnsupportedFormat {
                format: format!("{:?}", supported.sample_format()),
            });
        }

        let requested = config.buffer_size as u32;
        let fixed_supported = match supported.buffer_size() {
            cpal::SupportedBufferSize::Range { min, max } => (*min..=*max).contains(&requested),
            cpal::SupportedBufferSize::Unknown => false,
        };
        let mut stream_config: cpal::StreamConfig = supported.into();
        if fixed_supported {
            stream_config.buffer_size = cpal::BufferSize::Fixed(requested);
        } else {
            // advance() counts callbacks, so the device size only changes their length
            tracing::warn!(
                "[CpalBackend] Device rejects {}-frame buffers, using its default size",
                requested
            );
        }
        let channels = stream_config.channels as usize;

        // The device decides the rate; the bank follows it
        let bank_config = SynthConfig {
            sample_rate: stream_config.sample_rate.0,
            ..config.clone()
        };
        tracing::info!(
            "[CpalBackend] Output device: {} Hz, {} channel(s), buffer {:?}",
            bank_config.sample_rate,
            channels,
            stream_config.buffer_size
        );

        let (mut renderer, clock) =
            CallbackRenderer::new(OscillatorBank::with_receiver(&bank_config, receiver));
        self.clock = Some(clock);
        let err_fn = |err| tracing::error!("[CpalBackend] Output stream error: {}", err);

        device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    renderer.render(data, channels);
                },
                err_fn,
                None,
            )
            .map_err(|e| AudioError::StreamOpenFailed {
                reason: format!("{:?}", e),
            })
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn start(&mut self, config: &SynthConfig, receiver: ParameterReceiver) -> Result<(), AudioError> {
        if self.stream.is_some() {
            return Err(AudioError::AlreadyRunning);
        }

        let stream = self.create_output_stream(config, receiver)?;
        stream.play().map_err(|e| AudioError::HardwareError {
            details: format!("Output start failed: {}", e),
        })?;
        self.stream = Some(stream);
        Ok(())
    }

    fn advance(&mut self, buffers: usize) -> Result<(), AudioError> {
        if self.stream.is_none() {
            return Err(AudioError::NotRunning);
        }
        let clock = self.clock.as_ref().ok_or(AudioError::NotRunning)?;
        clock.wait_for(buffers as u64, DEFAULT_STALL_TIMEOUT)
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        let stream = self.stream.take().ok_or(AudioError::NotRunning)?;
        stream.pause().map_err(|e| AudioError::HardwareError {
            details: format!("Output stop failed: {}", e),
        })?;
        tracing::info!(
            "[CpalBackend] Stopped after {} frames",
            self.frames_rendered()
        );
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    fn name(&self) -> &'static str {
        "cpal"
    }
}
