// Landmark input types
//
// Mirrors the per-frame payload of the pose estimator: one list of
// landmarks per detected person, in screen and/or world space. Only the
// first person is ever read.

use serde::{Deserialize, Serialize};

use super::joints::TrackedJoint;
use super::types::{CoordinateSpace, Vec3};

/// Single landmark as reported by the pose estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Screen-space landmarks may omit depth
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// One pose-estimator result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseInput {
    /// Monotonic capture time in milliseconds
    pub timestamp: f64,
    /// Normalized screen-space landmarks, one list per person
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<Vec<Landmark>>>,
    /// Metric world-space landmarks, one list per person
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_landmarks: Option<Vec<Vec<Landmark>>>,
}

impl PoseInput {
    /// Landmarks of the first person in `space`, if any were detected
    pub fn first_person(&self, space: CoordinateSpace) -> Option<&[Landmark]> {
        let people = match space {
            CoordinateSpace::World => self.world_landmarks.as_ref(),
            CoordinateSpace::Screen => self.landmarks.as_ref(),
        }?;
        people
            .first()
            .map(Vec::as_slice)
            .filter(|person| !person.is_empty())
    }

    /// True when neither space carries a person
    pub fn is_empty(&self) -> bool {
        self.first_person(CoordinateSpace::World).is_none()
            && self.first_person(CoordinateSpace::Screen).is_none()
    }

    /// Raw position of a tracked joint, or `None` if absent or non-finite
    pub fn joint_position(&self, joint: TrackedJoint, space: CoordinateSpace) -> Option<Vec3> {
        self.first_person(space)?
            .get(joint.landmark_index())
            .map(Landmark::position)
            .filter(Vec3::is_finite)
    }
}
