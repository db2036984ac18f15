// Motion Synth Core - body motion to additive synthesis
// Pose landmarks -> kinematics -> mapping strategies -> lock-free oscillator bank

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod mapping;
pub mod pipeline;
pub mod synth;
pub mod tracking;

// Re-exports for convenience
pub use config::AppConfig;
pub use engine::{AudioBackend, OfflineBackend, SynthEngine};
pub use error::{AudioError, ConfigError, ErrorCode};
pub use mapping::{build_strategy, MappingStrategy, OscillatorParams, ParameterSet, StrategyKind};
pub use pipeline::MotionPipeline;
pub use synth::{OscillatorBank, ParameterChannel, ParameterPublisher, ParameterReceiver};
pub use tracking::{MotionFrame, MotionTracker, PoseInput};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_and_engine_build() {
        let config = AppConfig::default();
        assert!(MotionPipeline::new(&config).is_ok());
        assert!(SynthEngine::new(OfflineBackend::new(), config.synth).is_ok());
    }
}
