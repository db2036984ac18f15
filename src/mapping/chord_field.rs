// Chord field - spatially gated envelope voices in screen space
//
// Four vertical anchor lines sit across the image. Each owns a three-partial
// chord whose envelope is driven by wrist speed, weighted by how close the
// wrist is horizontally to the anchor:
//
//   proximity = 1 - min(1, |x - anchorX| / maxDistance)
//   drive     = speed_r * proximity_r + speed_l * proximity_l
//
// Both wrists feed one accumulator, so their increases add up before the
// single release term is applied.

use std::f32::consts::PI;

use super::chord::triad;
use super::envelope::ChordState;
use super::params::ParameterSet;
use super::range::ValueRange;
use super::{hold_muted, tracked, MappingStrategy, StrategyKind};
use crate::config::MappingConfig;
use crate::tracking::{CoordinateSpace, Kinematics, MotionFrame, TrackedJoint};

const NOISE_FLOOR: f32 = 0.01;

/// One chord anchored at a horizontal screen position
#[derive(Debug, Clone)]
pub struct FieldAnchor {
    /// Normalized screen x of the anchor line
    pub x: f32,
    pub voice: ChordState,
}

impl FieldAnchor {
    fn new(x: f32, fundamental: f32, attack: f32) -> Self {
        Self {
            x,
            voice: ChordState::new(fundamental, triad([0.0, PI / 2.0, PI], attack), NOISE_FLOOR),
        }
    }
}

/// Four anchors across the screen, swelled by nearby wrist motion
#[derive(Debug, Clone)]
pub struct ChordFieldStrategy {
    anchors: Vec<FieldAnchor>,
    velocities: ValueRange,
    max_distance: f32,
    dt: f32,
}

impl ChordFieldStrategy {
    pub fn new(config: &MappingConfig) -> Self {
        let anchors = vec![
            FieldAnchor::new(0.2, 220.0, 0.1),
            FieldAnchor::new(0.4, 500.0, 0.3),
            FieldAnchor::new(0.6, 660.0, 0.1),
            FieldAnchor::new(0.8, 900.0, 0.1),
        ];
        Self {
            anchors,
            velocities: config.screen_velocity_range,
            max_distance: config.field_max_distance,
            dt: config.envelope_dt,
        }
    }

    pub fn anchors(&self) -> &[FieldAnchor] {
        &self.anchors
    }

    /// Horizontal proximity weight of a point to an anchor, in [0, 1]
    pub fn proximity(&self, anchor_x: f32, x: f32) -> f32 {
        1.0 - ((x - anchor_x).abs() / self.max_distance).min(1.0)
    }

    fn drive(&self, anchor_x: f32, wrist: Option<&Kinematics>) -> f32 {
        wrist.map_or(0.0, |k| {
            self.velocities.normalize(k.velocity.magnitude) * self.proximity(anchor_x, k.position.x)
        })
    }

    fn wave_count(&self) -> usize {
        self.anchors.iter().map(|anchor| anchor.voice.len()).sum()
    }
}

impl MappingStrategy for ChordFieldStrategy {
    fn map(&mut self, frame: &MotionFrame, previous: &ParameterSet) -> ParameterSet {
        let left = tracked(frame, TrackedJoint::LeftWrist, CoordinateSpace::Screen);
        let right = tracked(frame, TrackedJoint::RightWrist, CoordinateSpace::Screen);
        if left.is_none() && right.is_none() {
            return hold_muted(previous, || self.silent_layout());
        }

        let drives: Vec<f32> = self
            .anchors
            .iter()
            .map(|anchor| self.drive(anchor.x, right) + self.drive(anchor.x, left))
            .collect();

        let gain = 1.0 / self.anchors.len() as f32;
        let mut out = ParameterSet::with_capacity(self.wave_count());
        for (anchor, drive) in self.anchors.iter_mut().zip(drives) {
            anchor.voice.step(drive, self.dt);
            anchor.voice.emit(gain, &mut out);
        }
        out
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::ChordField
    }

    fn voice_count(&self) -> usize {
        self.anchors.len()
    }

    fn silent_layout(&self) -> ParameterSet {
        let mut out = ParameterSet::with_capacity(self.wave_count());
        for anchor in &self.anchors {
            anchor.voice.emit_silent(&mut out);
        }
        out
    }
}
