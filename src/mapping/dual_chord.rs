// Two envelope voices, one per wrist

use std::f32::consts::PI;

use super::chord::triad;
use super::envelope::{ChordState, Harmonic};
use super::params::ParameterSet;
use super::range::ValueRange;
use super::{hold_muted, tracked, MappingStrategy, StrategyKind};
use crate::config::MappingConfig;
use crate::tracking::{CoordinateSpace, Kinematics, MotionFrame, TrackedJoint};

const LEFT_FUNDAMENTAL: f32 = 220.0;
const RIGHT_FUNDAMENTAL: f32 = 440.0;
const NOISE_FLOOR: f32 = 0.1;
const VOICES: usize = 2;

/// Five integer partials with slow release for the low voice
fn low_voice() -> Vec<Harmonic> {
    [
        (1.0, 0.4, 4.0),
        (2.0, 0.4, 8.0),
        (3.0, 0.2, 16.0),
        (4.0, 0.2, 16.0),
        (5.0, 0.1, 16.0),
    ]
    .into_iter()
    .map(|(ratio, weight, release)| Harmonic::new(ratio, weight, 0.0, 0.1, release))
    .collect()
}

/// Left wrist swells a 220 Hz voice, right wrist a 440 Hz triad
///
/// A wrist that is not tracked contributes no drive, so its voice keeps
/// releasing. Only when neither wrist is present is the frame treated as
/// missing.
#[derive(Debug, Clone)]
pub struct DualChordStrategy {
    left: ChordState,
    right: ChordState,
    velocities: ValueRange,
    dt: f32,
}

impl DualChordStrategy {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            left: ChordState::new(LEFT_FUNDAMENTAL, low_voice(), NOISE_FLOOR),
            right: ChordState::new(RIGHT_FUNDAMENTAL, triad([0.0, PI / 2.0, PI], 0.1), NOISE_FLOOR),
            velocities: config.envelope_velocity_range,
            dt: config.envelope_dt,
        }
    }

    pub fn voices(&self) -> [&ChordState; VOICES] {
        [&self.left, &self.right]
    }

    fn wave_count(&self) -> usize {
        self.left.len() + self.right.len()
    }
}

impl MappingStrategy for DualChordStrategy {
    fn map(&mut self, frame: &MotionFrame, previous: &ParameterSet) -> ParameterSet {
        let left = tracked(frame, TrackedJoint::LeftWrist, CoordinateSpace::World);
        let right = tracked(frame, TrackedJoint::RightWrist, CoordinateSpace::World);
        if left.is_none() && right.is_none() {
            return hold_muted(previous, || self.silent_layout());
        }

        let drive = |kinematics: Option<&Kinematics>| {
            kinematics.map_or(0.0, |k| self.velocities.normalize(k.velocity.magnitude))
        };
        let (left_drive, right_drive) = (drive(left), drive(right));
        self.left.step(left_drive, self.dt);
        self.right.step(right_drive, self.dt);

        let gain = 1.0 / VOICES as f32;
        let mut out = ParameterSet::with_capacity(self.wave_count());
        self.left.emit(gain, &mut out);
        self.right.emit(gain, &mut out);
        out
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::DualChord
    }

    fn voice_count(&self) -> usize {
        VOICES
    }

    fn silent_layout(&self) -> ParameterSet {
        let mut out = ParameterSet::with_capacity(self.wave_count());
        self.left.emit_silent(&mut out);
        self.right.emit_silent(&mut out);
        out
    }
}
