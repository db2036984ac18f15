// Single sine driven by the left wrist

use super::params::{OscillatorParams, ParameterSet};
use super::range::{height_to_frequency, velocity_to_amplitude, ValueRange};
use super::{hold_muted, tracked, MappingStrategy, StrategyKind};
use crate::config::MappingConfig;
use crate::tracking::{CoordinateSpace, MotionFrame, TrackedJoint};

/// Left-wrist height sets the pitch, left-wrist speed the loudness
#[derive(Debug, Clone)]
pub struct LeftWristStrategy {
    frequencies: ValueRange,
    heights: ValueRange,
    velocities: ValueRange,
}

impl LeftWristStrategy {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            frequencies: config.frequency_range,
            heights: config.height_range,
            velocities: config.velocity_range,
        }
    }
}

impl MappingStrategy for LeftWristStrategy {
    fn map(&mut self, frame: &MotionFrame, previous: &ParameterSet) -> ParameterSet {
        let Some(wrist) = tracked(frame, TrackedJoint::LeftWrist, CoordinateSpace::World) else {
            return hold_muted(previous, || self.silent_layout());
        };

        let frequency = height_to_frequency(wrist.position.y, &self.heights, &self.frequencies);
        let amplitude = velocity_to_amplitude(wrist.velocity.magnitude, &self.velocities);
        ParameterSet::from(vec![OscillatorParams::new(frequency, amplitude, 0.0)])
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::LeftWrist
    }

    fn voice_count(&self) -> usize {
        1
    }

    fn silent_layout(&self) -> ParameterSet {
        ParameterSet::from(vec![OscillatorParams::SILENT])
    }
}
