//! Deterministic synthetic gestures.
//!
//! Produces complete pose-estimator payloads (both coordinate spaces, full
//! 33-point topology) for a standing figure performing a scripted movement,
//! so the whole pipeline can be exercised without a camera.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::tracking::{Landmark, PoseInput, TrackedJoint, Vec3, POSE_LANDMARK_COUNT};

/// Scripted movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gesture {
    /// Both arms raised and lowered, the right one half a cycle behind
    ArmRaise,
    /// Wrists swept horizontally across the frame in opposite directions
    WristSweep,
    /// Standing still
    Idle,
}

impl Gesture {
    pub const ALL: [Gesture; 3] = [Gesture::ArmRaise, Gesture::WristSweep, Gesture::Idle];

    pub const fn name(self) -> &'static str {
        match self {
            Gesture::ArmRaise => "arm-raise",
            Gesture::WristSweep => "wrist-sweep",
            Gesture::Idle => "idle",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gesture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Gesture::ALL
            .into_iter()
            .find(|gesture| gesture.name() == s)
            .ok_or_else(|| anyhow!("Unknown gesture '{s}' (expected arm-raise, wrist-sweep or idle)"))
    }
}

/// Parameters of a synthesized take
#[derive(Debug, Clone)]
pub struct GestureSpec {
    pub gesture: Gesture,
    pub duration_secs: f32,
    pub fps: f32,
    /// Uniform noise added to every coordinate, in the unit of its space
    pub jitter: f32,
    pub seed: u64,
}

impl GestureSpec {
    pub fn new(gesture: Gesture) -> Self {
        Self {
            gesture,
            duration_secs: 4.0,
            fps: 30.0,
            jitter: 0.0,
            seed: 7,
        }
    }

    pub fn with_duration(mut self, duration_secs: f32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_jitter(mut self, jitter: f32, seed: u64) -> Self {
        self.jitter = jitter;
        self.seed = seed;
        self
    }

    pub fn frame_count(&self) -> usize {
        if self.duration_secs.is_finite() && self.fps.is_finite() && self.fps > 0.0 {
            (self.duration_secs * self.fps).max(0.0).round() as usize
        } else {
            0
        }
    }
}

// Resting figure in world space: metres, origin between the hips, y down
const REST_POSE: [(TrackedJoint, Vec3); 13] = [
    (TrackedJoint::Nose, Vec3::new(0.0, -0.65, -0.05)),
    (TrackedJoint::LeftShoulder, Vec3::new(0.18, -0.45, 0.0)),
    (TrackedJoint::RightShoulder, Vec3::new(-0.18, -0.45, 0.0)),
    (TrackedJoint::LeftElbow, Vec3::new(0.22, -0.2, 0.0)),
    (TrackedJoint::RightElbow, Vec3::new(-0.22, -0.2, 0.0)),
    (TrackedJoint::LeftWrist, Vec3::new(0.25, -0.5, 0.0)),
    (TrackedJoint::RightWrist, Vec3::new(-0.25, -0.5, 0.0)),
    (TrackedJoint::LeftHip, Vec3::new(0.1, 0.0, 0.0)),
    (TrackedJoint::RightHip, Vec3::new(-0.1, 0.0, 0.0)),
    (TrackedJoint::LeftKnee, Vec3::new(0.1, 0.45, 0.0)),
    (TrackedJoint::RightKnee, Vec3::new(-0.1, 0.45, 0.0)),
    (TrackedJoint::LeftAnkle, Vec3::new(0.1, 0.85, 0.0)),
    (TrackedJoint::RightAnkle, Vec3::new(-0.1, 0.85, 0.0)),
];

/// World y of a fully raised wrist
const RAISED_WRIST_Y: f32 = -2.0;
/// Screen x range covered by a sweep
const SWEEP_RANGE: (f32, f32) = (0.1, 0.9);

/// Render a gesture as a sequence of pose payloads
///
/// Timestamps start at 0 and advance by `1000 / fps` ms. Identical specs
/// always produce identical output.
pub fn synthesize(spec: &GestureSpec) -> Vec<PoseInput> {
    let frames = spec.frame_count();
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let jitter = if spec.jitter.is_finite() { spec.jitter.abs() } else { 0.0 };

    log::debug!(
        "[Gestures] {} frames of {} at {} fps, jitter {}",
        frames,
        spec.gesture,
        spec.fps,
        jitter
    );

    (0..frames)
        .map(|index| {
            let t = index as f32 / spec.fps;
            let phase = if spec.duration_secs > 0.0 { t / spec.duration_secs } else { 0.0 };

            let mut world = vec![Landmark::new(0.0, 0.0, 0.0); POSE_LANDMARK_COUNT];
            let mut screen = vec![Landmark::new(0.5, 0.5, 0.0); POSE_LANDMARK_COUNT];
            for (joint, rest) in REST_POSE {
                let position = pose_joint(spec.gesture, joint, rest, phase);
                world[joint.landmark_index()] = jittered(position, jitter, &mut rng);
                screen[joint.landmark_index()] = jittered(to_screen(position), jitter * 0.25, &mut rng);
            }

            PoseInput {
                timestamp: index as f64 * 1000.0 / spec.fps as f64,
                landmarks: Some(vec![screen]),
                world_landmarks: Some(vec![world]),
            }
        })
        .collect()
}

fn pose_joint(gesture: Gesture, joint: TrackedJoint, rest: Vec3, phase: f32) -> Vec3 {
    match (gesture, joint) {
        (Gesture::ArmRaise, TrackedJoint::LeftWrist) => raised(rest, phase),
        (Gesture::ArmRaise, TrackedJoint::RightWrist) => raised(rest, phase + 0.5),
        (Gesture::WristSweep, TrackedJoint::LeftWrist) => swept(rest, phase),
        (Gesture::WristSweep, TrackedJoint::RightWrist) => swept(rest, phase + 0.5),
        _ => rest,
    }
}

/// One raise-and-lower cycle per take
fn raised(rest: Vec3, phase: f32) -> Vec3 {
    let lift = 0.5 * (1.0 - (2.0 * PI * phase).cos());
    Vec3::new(rest.x, rest.y + (RAISED_WRIST_Y - rest.y) * lift, rest.z)
}

/// Two full sweeps per take, triangle-shaped
fn swept(rest: Vec3, phase: f32) -> Vec3 {
    let cycle = (phase * 2.0).fract();
    let triangle = if cycle < 0.5 { cycle * 2.0 } else { 2.0 - cycle * 2.0 };
    let screen_x = SWEEP_RANGE.0 + (SWEEP_RANGE.1 - SWEEP_RANGE.0) * triangle;
    Vec3::new((screen_x - 0.5) * 2.0, rest.y, rest.z)
}

/// Normalized image coordinates of a world position
fn to_screen(position: Vec3) -> Vec3 {
    Vec3::new(0.5 + position.x * 0.5, 0.5 + position.y * 0.3, position.z)
}

fn jittered(position: Vec3, jitter: f32, rng: &mut StdRng) -> Landmark {
    if jitter == 0.0 {
        return Landmark::new(position.x, position.y, position.z);
    }
    Landmark::new(
        position.x + rng.gen_range(-jitter..=jitter),
        position.y + rng.gen_range(-jitter..=jitter),
        position.z + rng.gen_range(-jitter..=jitter),
    )
}
