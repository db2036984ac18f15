// MotionPipeline - the motion domain, composed explicitly
//
// PoseInput -> MotionTracker -> MappingStrategy -> ParameterPublisher
//
// Runs synchronously on whichever thread delivers pose results. The
// publisher is optional so the same pipeline can be driven without audio
// (mapping dumps, tests) and attached to an engine later.

use crate::config::AppConfig;
use crate::error::{log_config_error, ConfigError};
use crate::mapping::{build_strategy, MappingStrategy, ParameterSet, StrategyKind};
use crate::synth::ParameterPublisher;
use crate::tracking::{MotionFrame, MotionTracker, PoseInput};

/// Tracker and strategy wired to an optional parameter publisher
pub struct MotionPipeline {
    tracker: MotionTracker,
    strategy: Box<dyn MappingStrategy>,
    previous: ParameterSet,
    publisher: Option<ParameterPublisher>,
}

impl MotionPipeline {
    /// Build a pipeline from a full application config
    ///
    /// # Errors
    /// Returns the first invalid setting; nothing is constructed in that case.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log_config_error(&err, "MotionPipeline::new");
            return Err(err);
        }
        let strategy = build_strategy(&config.mapping)?;
        Ok(Self {
            tracker: MotionTracker::new(&config.tracking)?,
            strategy,
            previous: ParameterSet::new(),
            publisher: None,
        })
    }

    /// Attach the publishing end of a parameter channel
    ///
    /// # Returns
    /// The publisher that was attached before, if any.
    pub fn connect(&mut self, publisher: ParameterPublisher) -> Option<ParameterPublisher> {
        log::info!("[MotionPipeline] Publisher connected");
        self.publisher.replace(publisher)
    }

    /// Detach and return the publisher, e.g. to hand it to the engine's shutdown
    pub fn disconnect(&mut self) -> Option<ParameterPublisher> {
        self.publisher.take()
    }

    pub fn publisher_mut(&mut self) -> Option<&mut ParameterPublisher> {
        self.publisher.as_mut()
    }

    /// Run one pose result through every stage
    ///
    /// # Returns
    /// The set produced for this frame, or `None` when the input carried no
    /// landmarks. In that case neither the strategy nor the publisher runs
    /// and the audio keeps its current targets.
    pub fn process(&mut self, input: &PoseInput) -> Option<&ParameterSet> {
        let frame = self.tracker.process_pose(input)?;
        Some(self.map_frame(&frame))
    }

    /// Run an already extracted frame through the strategy and publisher
    pub fn map_frame(&mut self, frame: &MotionFrame) -> &ParameterSet {
        let next = self.strategy.map(frame, &self.previous);
        self.previous = next;

        if let Some(publisher) = self.publisher.as_mut() {
            if !publisher.publish(&self.previous) {
                log::trace!("[MotionPipeline] Channel full, set held as pending");
            }
        }
        &self.previous
    }

    /// The set returned by the most recent `process`
    pub fn current(&self) -> &ParameterSet {
        &self.previous
    }

    pub fn tracker(&self) -> &MotionTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut MotionTracker {
        &mut self.tracker
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Start a new session with the same strategy kind
    ///
    /// Tracker state and the held parameter set are cleared. The strategy is
    /// rebuilt so its envelopes start from silence.
    pub fn reset(&mut self, config: &AppConfig) -> Result<(), ConfigError> {
        self.strategy = build_strategy(&config.mapping)?;
        self.tracker.reset();
        self.previous.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::ParameterChannel;
    use crate::tracking::{Landmark, TrackedJoint, POSE_LANDMARK_COUNT};

    fn pose(timestamp: f64, left_wrist_y: f32) -> PoseInput {
        let mut person = vec![Landmark::new(0.0, -1.0, 0.0); POSE_LANDMARK_COUNT];
        person[TrackedJoint::LeftWrist.landmark_index()] = Landmark::new(0.0, left_wrist_y, 0.0);
        PoseInput {
            timestamp,
            landmarks: None,
            world_landmarks: Some(vec![person]),
        }
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.tracking.smoothing_alpha = 1.0;
        config
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = config();
        config.mapping.envelope_dt = 0.0;
        assert!(MotionPipeline::new(&config).is_err());
    }

    #[test]
    fn test_empty_input_skips_every_stage() {
        let mut pipeline = MotionPipeline::new(&config()).unwrap();
        let (publisher, mut receiver) = ParameterChannel::new(4, 8);
        pipeline.connect(publisher);

        assert!(pipeline.process(&PoseInput::default()).is_none());
        assert!(pipeline.current().is_empty());
        assert!(receiver.receive().is_none());
        assert_eq!(pipeline.tracker().frames_processed(), 0);
    }

    #[test]
    fn test_sets_reach_the_receiver() {
        let mut pipeline = MotionPipeline::new(&config()).unwrap();
        let (publisher, mut receiver) = ParameterChannel::new(4, 8);
        assert!(pipeline.connect(publisher).is_none());

        pipeline.process(&pose(0.0, -2.0));
        let set = pipeline.process(&pose(66.0, -0.5)).unwrap().clone();

        let received = receiver.receive().unwrap();
        assert_eq!(received, &set);
        assert_eq!(received.as_slice()[0].frequency, 220.0);
    }

    #[test]
    fn test_runs_without_publisher() {
        let mut pipeline = MotionPipeline::new(&config()).unwrap();
        let set = pipeline.process(&pose(0.0, -2.0)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].frequency, 880.0);
        assert_eq!(pipeline.strategy_kind(), StrategyKind::LeftWrist);
    }

    #[test]
    fn test_reset_starts_from_silence() {
        let config = config();
        let mut pipeline = MotionPipeline::new(&config).unwrap();
        pipeline.process(&pose(0.0, -2.0));
        pipeline.process(&pose(66.0, -0.5));

        pipeline.reset(&config).unwrap();
        assert!(pipeline.current().is_empty());
        assert!(pipeline.tracker().latest().is_none());

        // first frame after reset has no previous frame, hence no motion
        let set = pipeline.process(&pose(1000.0, -0.5)).unwrap();
        assert_eq!(set.as_slice()[0].amplitude, 0.0);
    }

    #[test]
    fn test_disconnect_returns_publisher() {
        let mut pipeline = MotionPipeline::new(&config()).unwrap();
        let (publisher, _receiver) = ParameterChannel::new(1, 1);
        pipeline.connect(publisher);
        assert!(pipeline.publisher_mut().is_some());
        assert!(pipeline.disconnect().is_some());
        assert!(pipeline.disconnect().is_none());
    }
}
