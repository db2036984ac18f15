//! SynthEngine: lifecycle of the audio domain.
//!
//! Owns the backend and hands the motion domain the publishing end of the
//! parameter channel. Shutdown is a fade, not a cut: the last set is sent
//! again with all amplitudes at zero, the bank is given enough buffers to
//! smooth down to the configured floor, and only then is the backend
//! released.

use crate::config::SynthConfig;
use crate::engine::backend::AudioBackend;
use crate::error::{log_audio_error, AudioError, ConfigError};
use crate::synth::{ParameterChannel, ParameterPublisher};

/// Audio-domain orchestration over a pluggable backend
pub struct SynthEngine<B: AudioBackend> {
    backend: B,
    config: SynthConfig,
}

impl<B: AudioBackend> SynthEngine<B> {
    /// Create an engine around `backend`
    ///
    /// # Errors
    /// Returns the first invalid synth setting.
    pub fn new(backend: B, config: SynthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    /// Open the channel and start the backend
    ///
    /// # Returns
    /// The publishing end of the parameter channel, to be driven from the
    /// motion thread.
    pub fn start(&mut self) -> Result<ParameterPublisher, AudioError> {
        if self.backend.is_running() {
            return Err(AudioError::AlreadyRunning);
        }

        let (publisher, receiver) =
            ParameterChannel::new(self.config.channel_capacity, self.config.max_waves);
        if let Err(err) = self.backend.start(&self.config, receiver) {
            log_audio_error(&err, "SynthEngine::start");
            return Err(err);
        }

        tracing::info!(
            "[SynthEngine] Started '{}' backend: {} Hz, {} samples/buffer, smoothing {}",
            self.backend.name(),
            self.config.sample_rate,
            self.config.buffer_size,
            self.config.smoothing_factor
        );
        Ok(publisher)
    }

    /// Let `buffers` buffers of audio elapse
    pub fn advance(&mut self, buffers: usize) -> Result<(), AudioError> {
        self.backend.advance(buffers)
    }

    /// Fade out and release the backend
    ///
    /// # Arguments
    /// * `publisher` - The channel end returned by [`SynthEngine::start`];
    ///   `None` skips the muted update (the bank keeps its last targets
    ///   until the backend stops)
    pub fn shutdown(&mut self, publisher: Option<&mut ParameterPublisher>) -> Result<(), AudioError> {
        if !self.backend.is_running() {
            return Err(AudioError::NotRunning);
        }

        let fade_buffers = self.config.fade_buffers();
        tracing::info!(
            "[SynthEngine] Shutting down: fading over {} buffers",
            fade_buffers
        );

        match publisher {
            Some(publisher) => {
                publisher.publish_muted();
                for _ in 0..fade_buffers {
                    // the queue may be full until the bank drains it
                    publisher.flush();
                    self.backend.advance(1)?;
                }
            }
            None => self.backend.advance(fade_buffers)?,
        }

        self.backend.stop()?;
        tracing::info!("[SynthEngine] Backend '{}' released", self.backend.name());
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.backend.is_running()
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
