// Synth - additive oscillator bank fed by a lock-free parameter channel
//
// Module organization:
// - wave: Single smoothed sine oscillator
// - channel: Latest-value-wins SPSC handoff (ParameterPublisher/Receiver)
// - oscillator_bank: Buffer-boundary parameter application and rendering

mod channel;
mod oscillator_bank;
mod wave;

pub use channel::{ParameterChannel, ParameterPublisher, ParameterReceiver};
pub use oscillator_bank::{OscillatorBank, SILENCE_THRESHOLD};
pub use wave::Wave;
