// Single envelope chord swelled by right-wrist speed

use super::envelope::{ChordState, Harmonic};
use super::params::ParameterSet;
use super::range::ValueRange;
use super::{hold_muted, tracked, MappingStrategy, StrategyKind};
use crate::config::MappingConfig;
use crate::tracking::{CoordinateSpace, MotionFrame, TrackedJoint};

/// Root while the wrist moves down (positive world y velocity)
pub const FALLING_FUNDAMENTAL: f32 = 440.0;
/// Root while the wrist moves up or holds still
pub const RISING_FUNDAMENTAL: f32 = 660.0;

const NOISE_FLOOR: f32 = 0.1;

/// Three-partial voice: ratios 1 / 2.5 / 5, weights 0.5 / 0.3 / 0.2,
/// faster release on higher partials
pub(crate) fn triad(phases: [f32; 3], attack: f32) -> Vec<Harmonic> {
    vec![
        Harmonic::new(1.0, 0.5, phases[0], attack, 6.0),
        Harmonic::new(2.5, 0.3, phases[1], attack, 18.0),
        Harmonic::new(5.0, 0.2, phases[2], attack, 36.0),
    ]
}

/// Right-wrist speed drives the envelope; the direction of vertical motion
/// picks the root
#[derive(Debug, Clone)]
pub struct ChordStrategy {
    voice: ChordState,
    velocities: ValueRange,
    dt: f32,
}

impl ChordStrategy {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            voice: ChordState::new(RISING_FUNDAMENTAL, triad([0.0; 3], 0.1), NOISE_FLOOR),
            velocities: config.envelope_velocity_range,
            dt: config.envelope_dt,
        }
    }

    pub fn voice(&self) -> &ChordState {
        &self.voice
    }
}

impl MappingStrategy for ChordStrategy {
    fn map(&mut self, frame: &MotionFrame, previous: &ParameterSet) -> ParameterSet {
        let Some(wrist) = tracked(frame, TrackedJoint::RightWrist, CoordinateSpace::World) else {
            return hold_muted(previous, || self.silent_layout());
        };

        let fundamental = if wrist.velocity.vector.y > 0.0 {
            FALLING_FUNDAMENTAL
        } else {
            RISING_FUNDAMENTAL
        };
        self.voice.set_fundamental(fundamental);
        self.voice
            .step(self.velocities.normalize(wrist.velocity.magnitude), self.dt);

        let mut out = ParameterSet::with_capacity(self.voice.len());
        self.voice.emit(1.0, &mut out);
        out
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Chord
    }

    fn voice_count(&self) -> usize {
        1
    }

    fn silent_layout(&self) -> ParameterSet {
        let mut out = ParameterSet::with_capacity(self.voice.len());
        self.voice.emit_silent(&mut out);
        out
    }
}
