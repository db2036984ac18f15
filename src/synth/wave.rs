// Wave - one sine oscillator with smoothed targets

use std::f32::consts::TAU;

use crate::mapping::OscillatorParams;

/// State of one oscillator in the bank
///
/// Targets change only at buffer boundaries; `current_*` values glide toward
/// them once per buffer and hold still for every sample inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    pub target_frequency: f32,
    pub target_amplitude: f32,
    pub current_frequency: f32,
    pub current_amplitude: f32,
    /// Constant offset added to the accumulator when sampling
    pub phase_offset: f32,
    /// Running phase in [0, 2pi)
    accumulator: f32,
}

impl Wave {
    pub const SILENT: Wave = Wave {
        target_frequency: OscillatorParams::SILENT.frequency,
        target_amplitude: 0.0,
        current_frequency: OscillatorParams::SILENT.frequency,
        current_amplitude: 0.0,
        phase_offset: 0.0,
        accumulator: 0.0,
    };

    /// Take new targets from a parameter tuple
    ///
    /// A non-positive or non-finite frequency keeps the previous target;
    /// amplitude is clamped to [0, 1] with NaN read as 0.
    pub fn set_target(&mut self, params: &OscillatorParams) {
        if params.frequency.is_finite() && params.frequency > 0.0 {
            self.target_frequency = params.frequency;
        }
        self.target_amplitude = if params.amplitude.is_nan() {
            0.0
        } else {
            params.amplitude.clamp(0.0, 1.0)
        };
        if params.phase.is_finite() {
            self.phase_offset = params.phase;
        }
    }

    /// Close `factor` of the gap between current and target values
    pub fn smooth(&mut self, factor: f32) {
        self.current_frequency += (self.target_frequency - self.current_frequency) * factor;
        self.current_amplitude += (self.target_amplitude - self.current_amplitude) * factor;
    }

    /// Advance by one sample and return its value
    ///
    /// # Arguments
    /// * `radians_per_hz` - `2pi / sample_rate`
    #[inline]
    pub fn next_sample(&mut self, radians_per_hz: f32) -> f32 {
        self.accumulator += radians_per_hz * self.current_frequency;
        let sample = (self.accumulator + self.phase_offset).sin() * self.current_amplitude;
        if self.accumulator >= TAU {
            self.accumulator = self.accumulator.rem_euclid(TAU);
        }
        sample
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}

impl Default for Wave {
    fn default() -> Self {
        Self::SILENT
    }
}
