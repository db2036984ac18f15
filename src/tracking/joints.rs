// Tracked joint table
//
// Indices follow the 33-point pose landmark topology emitted by the pose
// estimator. Only this fixed subset is tracked; the set never changes
// between frames.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of landmarks in a full pose
pub const POSE_LANDMARK_COUNT: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackedJoint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl TrackedJoint {
    pub const ALL: [TrackedJoint; 13] = [
        TrackedJoint::Nose,
        TrackedJoint::LeftShoulder,
        TrackedJoint::RightShoulder,
        TrackedJoint::LeftElbow,
        TrackedJoint::RightElbow,
        TrackedJoint::LeftWrist,
        TrackedJoint::RightWrist,
        TrackedJoint::LeftHip,
        TrackedJoint::RightHip,
        TrackedJoint::LeftKnee,
        TrackedJoint::RightKnee,
        TrackedJoint::LeftAnkle,
        TrackedJoint::RightAnkle,
    ];

    /// Position of this joint in the raw landmark list
    pub const fn landmark_index(self) -> usize {
        match self {
            TrackedJoint::Nose => 0,
            TrackedJoint::LeftShoulder => 11,
            TrackedJoint::RightShoulder => 12,
            TrackedJoint::LeftElbow => 13,
            TrackedJoint::RightElbow => 14,
            TrackedJoint::LeftWrist => 15,
            TrackedJoint::RightWrist => 16,
            TrackedJoint::LeftHip => 23,
            TrackedJoint::RightHip => 24,
            TrackedJoint::LeftKnee => 25,
            TrackedJoint::RightKnee => 26,
            TrackedJoint::LeftAnkle => 27,
            TrackedJoint::RightAnkle => 28,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TrackedJoint::Nose => "nose",
            TrackedJoint::LeftShoulder => "leftShoulder",
            TrackedJoint::RightShoulder => "rightShoulder",
            TrackedJoint::LeftElbow => "leftElbow",
            TrackedJoint::RightElbow => "rightElbow",
            TrackedJoint::LeftWrist => "leftWrist",
            TrackedJoint::RightWrist => "rightWrist",
            TrackedJoint::LeftHip => "leftHip",
            TrackedJoint::RightHip => "rightHip",
            TrackedJoint::LeftKnee => "leftKnee",
            TrackedJoint::RightKnee => "rightKnee",
            TrackedJoint::LeftAnkle => "leftAnkle",
            TrackedJoint::RightAnkle => "rightAnkle",
        }
    }
}

impl fmt::Display for TrackedJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_within_pose() {
        for joint in TrackedJoint::ALL {
            assert!(joint.landmark_index() < POSE_LANDMARK_COUNT);
        }
    }

    #[test]
    fn test_indices_unique() {
        let mut indices: Vec<usize> = TrackedJoint::ALL.iter().map(|j| j.landmark_index()).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), TrackedJoint::ALL.len());
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&TrackedJoint::LeftWrist).unwrap();
        assert_eq!(json, "\"leftWrist\"");
        assert_eq!(TrackedJoint::LeftWrist.to_string(), "leftWrist");
    }
}
