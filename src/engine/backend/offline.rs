use crate::config::SynthConfig;
use crate::error::AudioError;
use crate::synth::{OscillatorBank, ParameterReceiver};

use super::AudioBackend;

/// Offline backend used for deterministic testing and CLI rendering.
///
/// Renders buffers only when asked to and keeps every sample in memory.
pub struct OfflineBackend {
    bank: Option<OscillatorBank>,
    buffer: Vec<f32>,
    samples: Vec<f32>,
    sample_rate: u32,
}

impl OfflineBackend {
    pub fn new() -> Self {
        Self {
            bank: None,
            buffer: Vec::new(),
            samples: Vec::new(),
            sample_rate: 0,
        }
    }

    /// Mono samples rendered so far
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Move out the rendered samples, leaving the backend empty
    pub fn take_samples(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.samples)
    }

    /// Rate the samples were rendered at; 0 before the first start
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The bank while running
    pub fn bank(&self) -> Option<&OscillatorBank> {
        self.bank.as_ref()
    }
}

impl Default for OfflineBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for OfflineBackend {
    fn start(&mut self, config: &SynthConfig, receiver: ParameterReceiver) -> Result<(), AudioError> {
        if self.bank.is_some() {
            return Err(AudioError::AlreadyRunning);
        }
        self.buffer = vec![0.0; config.buffer_size];
        self.sample_rate = config.sample_rate;
        self.bank = Some(OscillatorBank::with_receiver(config, receiver));
        Ok(())
    }

    fn advance(&mut self, buffers: usize) -> Result<(), AudioError> {
        let bank = self.bank.as_mut().ok_or(AudioError::NotRunning)?;
        self.samples.reserve(buffers * self.buffer.len());
        for _ in 0..buffers {
            bank.render(&mut self.buffer);
            self.samples.extend_from_slice(&self.buffer);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        match self.bank.take() {
            Some(_) => Ok(()),
            None => Err(AudioError::NotRunning),
        }
    }

    fn is_running(&self) -> bool {
        self.bank.is_some()
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
