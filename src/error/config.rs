// Configuration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Configuration error code constants
///
/// Error code range: 2001-2005
pub struct ConfigErrorCodes;

impl ConfigErrorCodes {
    /// A `[min, max]` range is empty, inverted or non-finite
    pub const INVALID_RANGE: i32 = 2001;

    /// A smoothing factor lies outside (0, 1]
    pub const INVALID_SMOOTHING: i32 = 2002;

    /// A size, rate or capacity is zero
    pub const ZERO_SIZE: i32 = 2003;

    /// A scalar parameter is non-finite or non-positive
    pub const INVALID_VALUE: i32 = 2004;

    /// A strategy name matches no known mapping strategy
    pub const UNKNOWN_STRATEGY: i32 = 2005;
}

/// Log a configuration error with structured context
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        "Config error in {}: code={}, component=AppConfig, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Configuration errors
///
/// Raised once at setup time. Nothing in the per-frame path returns these.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Range with `max <= min` or a non-finite bound
    InvalidRange { name: String, min: f32, max: f32 },

    /// Smoothing factor outside (0, 1]
    InvalidSmoothing { name: String, value: f32 },

    /// Zero-sized buffer, rate or capacity
    ZeroSize { name: String },

    /// Non-finite or non-positive scalar
    InvalidValue { name: String, value: f32 },

    /// Strategy name not recognized
    UnknownStrategy { name: String },
}

impl ConfigError {
    pub(crate) fn range(name: &str, min: f32, max: f32) -> Self {
        ConfigError::InvalidRange {
            name: name.to_string(),
            min,
            max,
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::InvalidRange { .. } => ConfigErrorCodes::INVALID_RANGE,
            ConfigError::InvalidSmoothing { .. } => ConfigErrorCodes::INVALID_SMOOTHING,
            ConfigError::ZeroSize { .. } => ConfigErrorCodes::ZERO_SIZE,
            ConfigError::InvalidValue { .. } => ConfigErrorCodes::INVALID_VALUE,
            ConfigError::UnknownStrategy { .. } => ConfigErrorCodes::UNKNOWN_STRATEGY,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::InvalidRange { name, min, max } => {
                format!("Invalid range {}: max ({}) must exceed min ({})", name, max, min)
            }
            ConfigError::InvalidSmoothing { name, value } => {
                format!("Smoothing factor {} must be in (0, 1], got {}", name, value)
            }
            ConfigError::ZeroSize { name } => format!("{} must be greater than 0", name),
            ConfigError::InvalidValue { name, value } => {
                format!("{} must be finite and positive, got {}", name, value)
            }
            ConfigError::UnknownStrategy { name } => format!("Unknown mapping strategy '{}'", name),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_codes() {
        assert_eq!(
            ConfigError::range("height", 1.0, 0.0).code(),
            ConfigErrorCodes::INVALID_RANGE
        );
        assert_eq!(
            ConfigError::InvalidSmoothing {
                name: "alpha".to_string(),
                value: 0.0
            }
            .code(),
            ConfigErrorCodes::INVALID_SMOOTHING
        );
        assert_eq!(
            ConfigError::ZeroSize {
                name: "buffer_size".to_string()
            }
            .code(),
            ConfigErrorCodes::ZERO_SIZE
        );
        assert_eq!(
            ConfigError::InvalidValue {
                name: "envelope_dt".to_string(),
                value: -1.0
            }
            .code(),
            ConfigErrorCodes::INVALID_VALUE
        );
        assert_eq!(
            ConfigError::UnknownStrategy {
                name: "theremin".to_string()
            }
            .code(),
            ConfigErrorCodes::UNKNOWN_STRATEGY
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::range("frequency_range", 880.0, 220.0);
        assert!(err.message().contains("frequency_range"));
        assert!(err.message().contains("220"));

        let err = ConfigError::ZeroSize {
            name: "sample_rate".to_string(),
        };
        assert_eq!(err.message(), "sample_rate must be greater than 0");
    }

    #[test]
    fn test_error_code_trait_object() {
        let err: &dyn ErrorCode = &ConfigError::range("x", 0.0, 0.0);
        assert_eq!(err.code(), 2001);
    }
}
