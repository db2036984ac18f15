// Numeric ranges and the scalar mappings built on them

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Closed interval `[min, max]` with `max > min`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Reject empty, inverted or non-finite ranges
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.max > self.min {
            Ok(())
        } else {
            Err(ConfigError::range(name, self.min, self.max))
        }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }

    /// Position of `value` inside the range, clamped to [0, 1]
    pub fn normalize(&self, value: f32) -> f32 {
        (self.clamp(value) - self.min) / self.span()
    }

    /// Inverse of [`ValueRange::normalize`] for `t` in [0, 1]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + t * self.span()
    }
}

/// Map a height to a pitch: `freqMin + (1 - normalizedHeight) * (freqMax - freqMin)`
///
/// Non-increasing in `height`. World-space y grows downward, so a raised
/// hand (smaller y) sounds higher.
pub fn height_to_frequency(height: f32, heights: &ValueRange, frequencies: &ValueRange) -> f32 {
    frequencies.lerp(1.0 - heights.normalize(height))
}

/// Map a height to an amplitude with a square-root response, louder as y falls
pub fn height_to_amplitude(height: f32, heights: &ValueRange) -> f32 {
    (1.0 - heights.normalize(height)).sqrt()
}

/// Map a speed to an amplitude with a square-root response
pub fn velocity_to_amplitude(speed: f32, velocities: &ValueRange) -> f32 {
    velocities.normalize(speed).sqrt()
}
