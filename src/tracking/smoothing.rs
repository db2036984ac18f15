// Smoothing module - exponential moving average over joint positions
//
// One smoother exists per coordinate space. The cache outlives individual
// frames: a joint that drops out keeps its last smoothed value and resumes
// from it when it reappears.

use std::collections::HashMap;

use super::joints::TrackedJoint;
use super::types::Vec3;

/// Per-joint EMA cache
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    alpha: f32,
    cache: HashMap<TrackedJoint, Vec3>,
}

impl PositionSmoother {
    /// Create a smoother with weight `alpha` for the newest sample
    ///
    /// `alpha` must lie in (0, 1]; the tracker config validates it.
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            cache: HashMap::with_capacity(TrackedJoint::ALL.len()),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Blend `raw` into the cached value for `joint` and return the result
    ///
    /// The first observation of a joint is returned unmodified.
    pub fn smooth(&mut self, joint: TrackedJoint, raw: Vec3) -> Vec3 {
        let smoothed = match self.cache.get(&joint) {
            Some(previous) => raw.ema(previous, self.alpha),
            None => raw,
        };
        self.cache.insert(joint, smoothed);
        smoothed
    }

    pub fn cached(&self, joint: TrackedJoint) -> Option<Vec3> {
        self.cache.get(&joint).copied()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
