//! Backend abstractions for the audio domain.

use crate::config::SynthConfig;
use crate::error::AudioError;
use crate::synth::ParameterReceiver;

/// Trait implemented by audio output backends.
///
/// A backend owns the audio timing domain: once started it builds an
/// [`OscillatorBank`](crate::synth::OscillatorBank) around the receiver and
/// pulls buffers from it, either from a device callback or on demand.
pub trait AudioBackend {
    /// Start pulling audio from a bank fed by `receiver`
    fn start(&mut self, config: &SynthConfig, receiver: ParameterReceiver) -> Result<(), AudioError>;

    /// Let `buffers` buffer intervals of audio elapse
    ///
    /// Offline backends render them immediately; device backends wait until
    /// the device has run that many callbacks, whatever its buffer size.
    fn advance(&mut self, buffers: usize) -> Result<(), AudioError>;

    /// Release the stream and the bank
    fn stop(&mut self) -> Result<(), AudioError>;

    fn is_running(&self) -> bool;

    fn name(&self) -> &'static str;
}

mod callback_clock;
mod offline;
pub use callback_clock::{CallbackClock, CallbackRenderer, DEFAULT_STALL_TIMEOUT};
pub use offline::OfflineBackend;

#[cfg(feature = "cpal_backend")]
mod cpal;
#[cfg(feature = "cpal_backend")]
pub use self::cpal::CpalBackend;
