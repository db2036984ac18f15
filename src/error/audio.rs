// Audio error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Error code range: 1001-1006
pub struct AudioErrorCodes;

impl AudioErrorCodes {
    /// Audio engine is already running
    pub const ALREADY_RUNNING: i32 = 1001;

    /// Audio engine is not running
    pub const NOT_RUNNING: i32 = 1002;

    /// Hardware error occurred
    pub const HARDWARE_ERROR: i32 = 1003;

    /// Failed to open audio stream
    pub const STREAM_OPEN_FAILED: i32 = 1004;

    /// Device offers no sample format the oscillator bank can write
    pub const UNSUPPORTED_FORMAT: i32 = 1005;

    /// Requested backend was not compiled into this build
    pub const BACKEND_UNAVAILABLE: i32 = 1006;
}

/// Log an audio error with structured context
///
/// Logs the numeric code, the failing component and the message so that
/// device problems can be traced from the CLI output alone.
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=SynthEngine, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio-related errors
///
/// These errors cover the audio domain lifecycle: opening the output
/// stream, starting and stopping it, and backend selection.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Audio engine is already running
    AlreadyRunning,

    /// Audio engine is not running
    NotRunning,

    /// Hardware error occurred
    HardwareError { details: String },

    /// Failed to open audio stream
    StreamOpenFailed { reason: String },

    /// Output device only offers sample formats we cannot render into
    UnsupportedFormat { format: String },

    /// Backend not available in this build
    BackendUnavailable { backend: String },
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::AlreadyRunning => AudioErrorCodes::ALREADY_RUNNING,
            AudioError::NotRunning => AudioErrorCodes::NOT_RUNNING,
            AudioError::HardwareError { .. } => AudioErrorCodes::HARDWARE_ERROR,
            AudioError::StreamOpenFailed { .. } => AudioErrorCodes::STREAM_OPEN_FAILED,
            AudioError::UnsupportedFormat { .. } => AudioErrorCodes::UNSUPPORTED_FORMAT,
            AudioError::BackendUnavailable { .. } => AudioErrorCodes::BACKEND_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::AlreadyRunning => {
                "Audio engine already running. Call shutdown() first.".to_string()
            }
            AudioError::NotRunning => "Audio engine not running. Call start() first.".to_string(),
            AudioError::HardwareError { details } => {
                format!("Hardware error: {}", details)
            }
            AudioError::StreamOpenFailed { reason } => {
                format!("Failed to open audio stream: {}", reason)
            }
            AudioError::UnsupportedFormat { format } => {
                format!("Unsupported output sample format: {}", format)
            }
            AudioError::BackendUnavailable { backend } => {
                format!("Audio backend '{}' is not available in this build", backend)
            }
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}

impl From<std::io::Error> for AudioError {
    fn from(err: std::io::Error) -> Self {
        AudioError::HardwareError {
            details: err.to_string(),
        }
    }
}
