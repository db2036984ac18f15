// MotionTracker - kinematic feature extraction from pose landmarks
//
// Turns the raw per-frame landmark lists of the pose estimator into smoothed
// positions, velocities and accelerations for a fixed set of joints, plus
// whole-body aggregates, in every coordinate space the input supplies.
//
// Module organization:
// - joints: Tracked joint table (landmark indices)
// - landmarks: Estimator input payload (PoseInput)
// - types: Output data structures (MotionFrame and friends)
// - smoothing: Per-joint EMA cache
// - kinematics: Finite differences and body aggregates
// - history: Bounded frame FIFO
// - mod.rs: Coordinator (MotionTracker)
//
// Per frame:
// 1. Select tracked joints from the first person in each space
// 2. Smooth positions (EMA, separate cache per space)
// 3. Difference against the previous frame for velocity and acceleration
// 4. Aggregate body features, push to history, notify the observer

mod history;
mod joints;
mod kinematics;
mod landmarks;
mod smoothing;
mod types;

pub use history::{FrameHistory, DEFAULT_HISTORY_CAPACITY};
pub use joints::{TrackedJoint, POSE_LANDMARK_COUNT};
pub use kinematics::{body_features, joint_kinematics};
pub use landmarks::{Landmark, PoseInput};
pub use smoothing::PositionSmoother;
pub use types::{BodyFeatures, CoordinateSpace, Joint, Kinematics, Motion, MotionFrame, Vec3};

use std::collections::BTreeMap;

use crate::config::TrackingConfig;
use crate::error::ConfigError;

/// Callback invoked with every frame the tracker produces
pub type FrameObserver = Box<dyn FnMut(&MotionFrame) + Send>;

/// MotionTracker coordinates smoothing, differencing and history
///
/// Single-threaded: one tracker serves one motion stream and is driven
/// synchronously from the frame source.
pub struct MotionTracker {
    world_smoother: PositionSmoother,
    screen_smoother: PositionSmoother,
    history: FrameHistory,
    last_timestamp: Option<f64>,
    default_delta_time: f32,
    observer: Option<FrameObserver>,
    frames_processed: u64,
}

impl MotionTracker {
    /// Create a tracker from a tracking config
    ///
    /// # Arguments
    /// * `config` - Smoothing alpha, history capacity and first-frame interval
    ///
    /// # Errors
    /// Returns the first invalid tracking setting; nothing is constructed in
    /// that case.
    pub fn new(config: &TrackingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "[MotionTracker] alpha={}, history={}, default_dt={}",
            config.smoothing_alpha,
            config.history_capacity,
            config.default_delta_time
        );
        Ok(Self {
            world_smoother: PositionSmoother::new(config.smoothing_alpha),
            screen_smoother: PositionSmoother::new(config.smoothing_alpha),
            history: FrameHistory::new(config.history_capacity),
            last_timestamp: None,
            default_delta_time: config.default_delta_time,
            observer: None,
            frames_processed: 0,
        })
    }

    /// Process one pose-estimator result
    ///
    /// # Returns
    /// The extracted frame, or `None` when the input carries no landmarks in
    /// either space. A `None` result leaves the tracker untouched: no history
    /// entry, no timestamp update, no observer call.
    pub fn process_pose(&mut self, input: &PoseInput) -> Option<MotionFrame> {
        if input.is_empty() {
            log::debug!(
                "[MotionTracker] No landmarks at t={}ms, frame skipped",
                input.timestamp
            );
            return None;
        }

        let delta_time = match self.last_timestamp {
            Some(previous) => {
                let dt = ((input.timestamp - previous) / 1000.0) as f32;
                if dt.is_finite() {
                    dt
                } else {
                    0.0
                }
            }
            None => self.default_delta_time,
        };

        let previous = self.history.latest();
        let mut joints = BTreeMap::new();
        for name in TrackedJoint::ALL {
            let prior = previous.and_then(|frame| frame.joint(name));

            let world = input
                .joint_position(name, CoordinateSpace::World)
                .map(|raw| {
                    let position = self.world_smoother.smooth(name, raw);
                    joint_kinematics(position, prior.and_then(|j| j.world.as_ref()), delta_time)
                });
            let screen = input
                .joint_position(name, CoordinateSpace::Screen)
                .map(|raw| {
                    let position = self.screen_smoother.smooth(name, raw);
                    joint_kinematics(position, prior.and_then(|j| j.screen.as_ref()), delta_time)
                });

            joints.insert(name, Joint { name, world, screen });
        }

        let body_world = body_features(joints.values().filter_map(|j| j.world.as_ref()));
        let body_screen = body_features(joints.values().filter_map(|j| j.screen.as_ref()));

        let frame = MotionFrame {
            timestamp_ms: input.timestamp,
            delta_time,
            joints,
            body_world,
            body_screen,
        };

        self.last_timestamp = Some(input.timestamp);
        self.history.push(frame.clone());
        self.frames_processed += 1;

        if let Some(observer) = self.observer.as_mut() {
            observer(&frame);
        }

        Some(frame)
    }

    /// Register a callback for every produced frame, replacing any previous one
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&MotionFrame) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    /// Most recently produced frame
    pub fn latest(&self) -> Option<&MotionFrame> {
        self.history.latest()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Forget all session state: history, smoothing caches and timestamp
    ///
    /// The observer stays registered.
    pub fn reset(&mut self) {
        log::info!(
            "[MotionTracker] Reset after {} frames",
            self.frames_processed
        );
        self.world_smoother.clear();
        self.screen_smoother.clear();
        self.history.clear();
        self.last_timestamp = None;
        self.frames_processed = 0;
    }
}
