//! Configuration management for dynamic parameter tuning
//!
//! This module provides runtime configuration loading from JSON files so the
//! tracker, the mapping ranges and the synthesizer can be tuned without
//! recompiling. Every section has defaults and `#[serde(default)]`, so a
//! config file only needs to list the values it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::mapping::{StrategyKind, ValueRange};

/// Default location of the optional config file
pub const DEFAULT_CONFIG_PATH: &str = "assets/motion_synth.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tracking: TrackingConfig,
    pub mapping: MappingConfig,
    pub synth: SynthConfig,
}

/// Motion tracker parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// EMA weight of the newest landmark sample, in (0, 1]
    pub smoothing_alpha: f32,
    /// Number of processed frames kept for differencing
    pub history_capacity: usize,
    /// Frame interval assumed before a second timestamp is known (seconds)
    pub default_delta_time: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.25,
            history_capacity: 5,
            // ~30 FPS camera
            default_delta_time: 0.033,
        }
    }
}

/// Motion-to-parameter mapping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Strategy constructed at startup
    pub strategy: StrategyKind,
    /// Output pitch range in Hz (A3..A5 by default)
    pub frequency_range: ValueRange,
    /// World-space y range of a tracked point in metres
    pub height_range: ValueRange,
    /// Speed range for direct velocity -> amplitude mapping (m/s)
    pub velocity_range: ValueRange,
    /// Speed range driving world-space envelopes (m/s)
    pub envelope_velocity_range: ValueRange,
    /// Speed range driving screen-space envelopes (screen widths/s)
    pub screen_velocity_range: ValueRange,
    /// Horizontal distance at which a chord-field anchor stops responding
    pub field_max_distance: f32,
    /// Envelope integration step in seconds
    pub envelope_dt: f32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::LeftWrist,
            frequency_range: ValueRange::new(220.0, 880.0),
            height_range: ValueRange::new(-2.0, -0.5),
            velocity_range: ValueRange::new(0.0, 5.0),
            envelope_velocity_range: ValueRange::new(0.2, 0.5),
            screen_velocity_range: ValueRange::new(0.2, 0.5),
            field_max_distance: 0.05,
            envelope_dt: 1.0 / 30.0,
        }
    }
}

/// Oscillator bank and audio boundary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Samples per render buffer (offline backend and preferred device size)
    pub buffer_size: usize,
    /// Fraction of the remaining gap closed per buffer, in (0, 1]
    pub smoothing_factor: f32,
    /// Upper bound on simultaneously rendered waves
    pub max_waves: usize,
    /// Slots in the parameter channel between motion and audio domains
    pub channel_capacity: usize,
    /// Attenuation the shutdown fade must reach before the stream is released
    pub fade_floor_db: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            buffer_size: 128,
            smoothing_factor: 0.1,
            max_waves: 64,
            channel_capacity: 8,
            fade_floor_db: -60.0,
        }
    }
}

impl SynthConfig {
    /// Number of buffers the shutdown fade needs to reach `fade_floor_db`
    ///
    /// Each buffer leaves `(1 - smoothing_factor)` of the amplitude, so the
    /// count is `ln(floor) / ln(1 - smoothing_factor)`, never below one.
    pub fn fade_buffers(&self) -> usize {
        let floor = 10f32.powf(self.fade_floor_db.min(0.0) / 20.0);
        let retain = 1.0 - self.smoothing_factor;
        if retain <= 0.0 || floor <= 0.0 {
            return 1;
        }
        let buffers = (floor.ln() / retain.ln()).ceil();
        if buffers.is_finite() && buffers >= 1.0 {
            buffers as usize
        } else {
            1
        }
    }

    /// Duration of one render buffer in seconds
    pub fn buffer_seconds(&self) -> f32 {
        self.buffer_size as f32 / self.sample_rate.max(1) as f32
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or
    /// malformed. Call [`AppConfig::validate`] on the result before use.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default asset path
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    /// Check every invariant the pipeline relies on
    ///
    /// Runs once at setup. Per-frame code assumes a validated config and
    /// never re-checks these bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracking.validate()?;
        self.mapping.validate()?;
        self.synth.validate()
    }
}

impl TrackingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_smoothing("tracking.smoothing_alpha", self.smoothing_alpha)?;
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroSize {
                name: "tracking.history_capacity".to_string(),
            });
        }
        validate_positive("tracking.default_delta_time", self.default_delta_time)
    }
}

impl MappingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.frequency_range.validate("mapping.frequency_range")?;
        if self.frequency_range.min <= 0.0 {
            return Err(ConfigError::range(
                "mapping.frequency_range",
                self.frequency_range.min,
                self.frequency_range.max,
            ));
        }
        self.height_range.validate("mapping.height_range")?;
        self.velocity_range.validate("mapping.velocity_range")?;
        self.envelope_velocity_range
            .validate("mapping.envelope_velocity_range")?;
        self.screen_velocity_range
            .validate("mapping.screen_velocity_range")?;
        validate_positive("mapping.field_max_distance", self.field_max_distance)?;
        validate_positive("mapping.envelope_dt", self.envelope_dt)
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSize {
                name: "synth.sample_rate".to_string(),
            });
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::ZeroSize {
                name: "synth.buffer_size".to_string(),
            });
        }
        if self.max_waves == 0 {
            return Err(ConfigError::ZeroSize {
                name: "synth.max_waves".to_string(),
            });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroSize {
                name: "synth.channel_capacity".to_string(),
            });
        }
        validate_smoothing("synth.smoothing_factor", self.smoothing_factor)?;
        if !self.fade_floor_db.is_finite() || self.fade_floor_db >= 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "synth.fade_floor_db".to_string(),
                value: self.fade_floor_db,
            });
        }
        Ok(())
    }
}

fn validate_smoothing(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSmoothing {
            name: name.to_string(),
            value,
        })
    }
}

fn validate_positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        })
    }
}
