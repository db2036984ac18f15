// Types module - Data structures for motion features
//
// Everything the tracker emits is plain data: frames are built once per
// processed pose and never mutated afterwards.

use std::collections::BTreeMap;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::joints::TrackedJoint;

/// 3D vector in either world (metres) or screen (normalized) units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm
    pub fn norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Linear interpolation from `self` (t = 0) to `other` (t = 1)
    pub fn lerp(&self, other: &Vec3, t: f32) -> Self {
        *self + (*other - *self).scale(t)
    }

    /// Exponential moving average step: `alpha * self + (1 - alpha) * previous`
    pub fn ema(&self, previous: &Vec3, alpha: f32) -> Self {
        let keep = 1.0 - alpha;
        Self::new(
            alpha * self.x + keep * previous.x,
            alpha * self.y + keep * previous.y,
            alpha * self.z + keep * previous.z,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Coordinate space a position was reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Metric space centred on the hips; y grows downward
    World,
    /// Normalized image coordinates in [0, 1]
    Screen,
}

/// A derivative vector together with its magnitude
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub vector: Vec3,
    pub magnitude: f32,
}

impl Motion {
    pub const ZERO: Motion = Motion {
        vector: Vec3::ZERO,
        magnitude: 0.0,
    };

    pub fn from_vector(vector: Vec3) -> Self {
        Self {
            magnitude: vector.norm(),
            vector,
        }
    }
}

/// Smoothed position and its derivatives for one joint in one space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: Vec3,
    pub velocity: Motion,
    pub acceleration: Motion,
}

/// One tracked joint
///
/// A space is `None` when the input did not supply it this frame or the
/// landmark was missing from that space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub name: TrackedJoint,
    pub world: Option<Kinematics>,
    pub screen: Option<Kinematics>,
}

impl Joint {
    pub fn in_space(&self, space: CoordinateSpace) -> Option<&Kinematics> {
        match space {
            CoordinateSpace::World => self.world.as_ref(),
            CoordinateSpace::Screen => self.screen.as_ref(),
        }
    }
}

/// Whole-body aggregates for one coordinate space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyFeatures {
    /// Mean position of the joints present
    pub center_of_mass: Vec3,
    /// Mean of the nonzero velocity magnitudes
    pub overall_velocity: f32,
    /// Mean of the nonzero acceleration magnitudes
    pub overall_acceleration: f32,
    /// Same value as `overall_velocity`
    pub activity_level: f32,
    /// Sum of squared nonzero velocity magnitudes
    pub energy: f32,
}

/// Motion features extracted from one pose frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionFrame {
    /// Capture timestamp in milliseconds
    pub timestamp_ms: f64,
    /// Seconds since the previous processed frame (default on the first)
    pub delta_time: f32,
    pub joints: BTreeMap<TrackedJoint, Joint>,
    pub body_world: Option<BodyFeatures>,
    pub body_screen: Option<BodyFeatures>,
}

impl MotionFrame {
    pub fn joint(&self, name: TrackedJoint) -> Option<&Joint> {
        self.joints.get(&name)
    }

    /// Kinematics of a joint in a space, if both are present
    pub fn kinematics(&self, name: TrackedJoint, space: CoordinateSpace) -> Option<&Kinematics> {
        self.joints.get(&name).and_then(|joint| joint.in_space(space))
    }

    pub fn body(&self, space: CoordinateSpace) -> Option<&BodyFeatures> {
        match space {
            CoordinateSpace::World => self.body_world.as_ref(),
            CoordinateSpace::Screen => self.body_screen.as_ref(),
        }
    }
}
