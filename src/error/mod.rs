// Error types for the motion synthesizer
//
// Setup-time failures (bad configuration, audio device problems) are the only
// errors surfaced as `Result`s. Per-frame conditions such as missing landmarks
// are handled in place and degrade to silence instead.

mod audio;
mod config;

pub use audio::{log_audio_error, AudioError, AudioErrorCodes};
pub use config::{log_config_error, ConfigError, ConfigErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so the CLI and logs report failures uniformly.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
