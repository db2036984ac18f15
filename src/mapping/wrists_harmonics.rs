// Dual-point mapping: one wrist picks the pitch, the other the loudness

use super::params::{OscillatorParams, ParameterSet};
use super::range::{height_to_amplitude, height_to_frequency, ValueRange};
use super::{hold_muted, tracked, MappingStrategy, StrategyKind};
use crate::config::MappingConfig;
use crate::tracking::{CoordinateSpace, MotionFrame, TrackedJoint};

/// Partials sounded above the fundamental, as multiples of it
pub const HARMONIC_MULTIPLIERS: [f32; 4] = [1.0, 2.0, 4.0, 8.0];

/// Left-wrist height sets the fundamental; right-wrist height sets a shared
/// amplitude spread evenly over [`HARMONIC_MULTIPLIERS`]
#[derive(Debug, Clone)]
pub struct WristsHarmonicsStrategy {
    frequencies: ValueRange,
    heights: ValueRange,
}

impl WristsHarmonicsStrategy {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            frequencies: config.frequency_range,
            heights: config.height_range,
        }
    }
}

impl MappingStrategy for WristsHarmonicsStrategy {
    fn map(&mut self, frame: &MotionFrame, previous: &ParameterSet) -> ParameterSet {
        let left = tracked(frame, TrackedJoint::LeftWrist, CoordinateSpace::World);
        let right = tracked(frame, TrackedJoint::RightWrist, CoordinateSpace::World);
        let (Some(left), Some(right)) = (left, right) else {
            return hold_muted(previous, || self.silent_layout());
        };

        let fundamental = height_to_frequency(left.position.y, &self.heights, &self.frequencies);
        let amplitude =
            height_to_amplitude(right.position.y, &self.heights) / HARMONIC_MULTIPLIERS.len() as f32;

        HARMONIC_MULTIPLIERS
            .iter()
            .map(|multiplier| OscillatorParams::new(fundamental * multiplier, amplitude, 0.0))
            .collect()
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::WristsHarmonics
    }

    fn voice_count(&self) -> usize {
        1
    }

    fn silent_layout(&self) -> ParameterSet {
        HARMONIC_MULTIPLIERS
            .iter()
            .map(|multiplier| OscillatorParams::new(OscillatorParams::SILENT.frequency * multiplier, 0.0, 0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::test_frames::frame_with;
    use crate::tracking::Vec3;

    #[test]
    fn test_partials_follow_both_wrists() {
        let frame = frame_with(
            &[
                (TrackedJoint::LeftWrist, Vec3::new(0.0, -1.25, 0.0), Vec3::ZERO),
                (TrackedJoint::RightWrist, Vec3::new(0.0, -2.0, 0.0), Vec3::ZERO),
            ],
            &[],
        );
        let mut strategy = WristsHarmonicsStrategy::new(&MappingConfig::default());
        let out = strategy.map(&frame, &ParameterSet::new());

        assert_eq!(out.len(), 4);
        let frequencies: Vec<f32> = out.iter().map(|p| p.frequency).collect();
        for (freq, expected) in frequencies.iter().zip([550.0, 1100.0, 2200.0, 4400.0]) {
            assert!((freq - expected).abs() < 1e-2, "{} != {}", freq, expected);
        }
        // sqrt(1 - 0) / 4
        assert!(out.iter().all(|p| p.amplitude == 0.25));
        assert!(out.total_amplitude() <= 1.0);
    }

    #[test]
    fn test_right_wrist_at_top_of_range_is_silent() {
        let frame = frame_with(
            &[
                (TrackedJoint::LeftWrist, Vec3::new(0.0, -2.0, 0.0), Vec3::ZERO),
                (TrackedJoint::RightWrist, Vec3::new(0.0, -0.2, 0.0), Vec3::ZERO),
            ],
            &[],
        );
        let mut strategy = WristsHarmonicsStrategy::new(&MappingConfig::default());
        let out = strategy.map(&frame, &ParameterSet::new());
        assert!(out.is_silent());
        assert_eq!(out.as_slice()[0].frequency, 880.0);
    }

    #[test]
    fn test_one_wrist_missing_mutes() {
        let frame = frame_with(
            &[(TrackedJoint::LeftWrist, Vec3::new(0.0, -1.0, 0.0), Vec3::ZERO)],
            &[],
        );
        let mut strategy = WristsHarmonicsStrategy::new(&MappingConfig::default());
        let out = strategy.map(&frame, &ParameterSet::new());
        assert_eq!(out, strategy.silent_layout());
    }
}
