// Mapping - motion features to oscillator parameters
//
// A MappingStrategy turns one MotionFrame into the ParameterSet the
// oscillator bank should move toward. Strategies are stateful (envelope
// voices keep their accumulators between calls) and are chosen once at
// startup through `build_strategy`.
//
// Module organization:
// - params: OscillatorParams / ParameterSet
// - range: ValueRange and the scalar height/speed mappings
// - envelope: ChordState attack/release voices
// - left_wrist, wrists_harmonics, chord, dual_chord, chord_field: strategies
// - mod.rs: Trait, StrategyKind, factory and shared edge policy
//
// Edge policy shared by all strategies: when a required joint or space is
// missing, or a feature is non-finite, the previous set is returned with all
// amplitudes at 0 (pitch held, sound muted) and envelopes are not advanced.

mod chord;
mod chord_field;
mod dual_chord;
mod envelope;
mod left_wrist;
mod params;
mod range;
mod wrists_harmonics;

pub use chord::ChordStrategy;
pub use chord_field::{ChordFieldStrategy, FieldAnchor};
pub use dual_chord::DualChordStrategy;
pub use envelope::{ChordState, Harmonic};
pub use left_wrist::LeftWristStrategy;
pub use params::{OscillatorParams, ParameterSet};
pub use range::{height_to_amplitude, height_to_frequency, velocity_to_amplitude, ValueRange};
pub use wrists_harmonics::WristsHarmonicsStrategy;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MappingConfig;
use crate::error::ConfigError;
use crate::tracking::{CoordinateSpace, Kinematics, MotionFrame, TrackedJoint};

/// Converts motion features into oscillator targets
///
/// `map` is called once per processed frame on the motion thread. It must
/// not panic and must never emit non-finite values.
pub trait MappingStrategy: Send {
    /// Produce the next parameter set
    ///
    /// # Arguments
    /// * `frame` - Features of the current frame
    /// * `previous` - The set this strategy returned last time (empty at start)
    fn map(&mut self, frame: &MotionFrame, previous: &ParameterSet) -> ParameterSet;

    fn kind(&self) -> StrategyKind;

    /// Number of concurrently sounding voices
    fn voice_count(&self) -> usize;

    /// The set emitted when there is nothing to hold: every wave this
    /// strategy produces, at zero amplitude
    fn silent_layout(&self) -> ParameterSet;
}

/// Available mapping strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    LeftWrist,
    WristsHarmonics,
    Chord,
    DualChord,
    ChordField,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::LeftWrist,
        StrategyKind::WristsHarmonics,
        StrategyKind::Chord,
        StrategyKind::DualChord,
        StrategyKind::ChordField,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StrategyKind::LeftWrist => "left-wrist",
            StrategyKind::WristsHarmonics => "wrists-harmonics",
            StrategyKind::Chord => "chord",
            StrategyKind::DualChord => "dual-chord",
            StrategyKind::ChordField => "chord-field",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            StrategyKind::LeftWrist => "left-wrist height sets pitch, left-wrist speed sets loudness",
            StrategyKind::WristsHarmonics => {
                "left-wrist height sets the fundamental, right-wrist height sets loudness of 4 partials"
            }
            StrategyKind::Chord => "right-wrist speed swells a 3-partial chord, vertical direction picks its root",
            StrategyKind::DualChord => "each wrist's speed swells its own chord (220 Hz left, 440 Hz right)",
            StrategyKind::ChordField => "four on-screen chord anchors swell as a moving wrist passes them",
        }
    }

    /// Coordinate space the strategy reads
    pub const fn space(self) -> CoordinateSpace {
        match self {
            StrategyKind::ChordField => CoordinateSpace::Screen,
            _ => CoordinateSpace::World,
        }
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::LeftWrist
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

/// Construct the strategy selected by `config.strategy`
///
/// Validates the mapping config first; this is the only place a strategy
/// can fail.
pub fn build_strategy(config: &MappingConfig) -> Result<Box<dyn MappingStrategy>, ConfigError> {
    config.validate()?;
    log::info!("[Mapping] Building strategy '{}'", config.strategy);

    let strategy: Box<dyn MappingStrategy> = match config.strategy {
        StrategyKind::LeftWrist => Box::new(LeftWristStrategy::new(config)),
        StrategyKind::WristsHarmonics => Box::new(WristsHarmonicsStrategy::new(config)),
        StrategyKind::Chord => Box::new(ChordStrategy::new(config)),
        StrategyKind::DualChord => Box::new(DualChordStrategy::new(config)),
        StrategyKind::ChordField => Box::new(ChordFieldStrategy::new(config)),
    };
    Ok(strategy)
}

/// Kinematics of a joint if present and finite in `space`
pub(crate) fn tracked(
    frame: &MotionFrame,
    joint: TrackedJoint,
    space: CoordinateSpace,
) -> Option<&Kinematics> {
    frame.kinematics(joint, space).filter(|k| {
        k.position.is_finite() && k.velocity.vector.is_finite() && k.velocity.magnitude.is_finite()
    })
}

/// Hold pitch and mute: `previous` with every amplitude at 0, or the
/// strategy's silent layout when there is no previous set
pub(crate) fn hold_muted<F>(previous: &ParameterSet, silent_layout: F) -> ParameterSet
where
    F: FnOnce() -> ParameterSet,
{
    if previous.is_empty() {
        silent_layout()
    } else {
        previous.muted()
    }
}

#[cfg(test)]
pub(crate) mod test_frames {
    use std::collections::BTreeMap;

    use crate::tracking::{BodyFeatures, Joint, Kinematics, Motion, MotionFrame, TrackedJoint, Vec3};

    /// Frame holding only the given joints, each with the given position and velocity
    pub fn frame_with(
        world: &[(TrackedJoint, Vec3, Vec3)],
        screen: &[(TrackedJoint, Vec3, Vec3)],
    ) -> MotionFrame {
        let mut joints = BTreeMap::new();
        for name in TrackedJoint::ALL {
            let pick = |list: &[(TrackedJoint, Vec3, Vec3)]| {
                list.iter()
                    .find(|(joint, _, _)| *joint == name)
                    .map(|&(_, position, velocity)| Kinematics {
                        position,
                        velocity: Motion::from_vector(velocity),
                        acceleration: Motion::ZERO,
                    })
            };
            joints.insert(
                name,
                Joint {
                    name,
                    world: pick(world),
                    screen: pick(screen),
                },
            );
        }
        MotionFrame {
            timestamp_ms: 0.0,
            delta_time: 1.0 / 30.0,
            joints,
            body_world: Some(BodyFeatures::default()),
            body_screen: None,
        }
    }

    pub fn empty_frame() -> MotionFrame {
        frame_with(&[], &[])
    }
}
