// Kinematics module - finite differences and whole-body aggregates
//
// Velocity and acceleration are first-order backward differences between
// consecutive processed frames. A joint without a predecessor in the same
// space, or a non-positive frame interval, yields zero motion.

use super::types::{BodyFeatures, Kinematics, Motion, Vec3};

/// Derive a joint's kinematics from its smoothed position
///
/// # Arguments
/// * `position` - Smoothed position this frame
/// * `previous` - The same joint/space in the previous frame, if it existed
/// * `delta_time` - Seconds since the previous frame
pub fn joint_kinematics(position: Vec3, previous: Option<&Kinematics>, delta_time: f32) -> Kinematics {
    let mut kinematics = Kinematics {
        position,
        velocity: Motion::ZERO,
        acceleration: Motion::ZERO,
    };

    let Some(previous) = previous else {
        return kinematics;
    };
    if !(delta_time > 0.0) {
        return kinematics;
    }

    let inv_dt = 1.0 / delta_time;
    kinematics.velocity = Motion::from_vector((position - previous.position).scale(inv_dt));
    kinematics.acceleration =
        Motion::from_vector((kinematics.velocity.vector - previous.velocity.vector).scale(inv_dt));
    kinematics
}

/// Aggregate per-joint kinematics into whole-body features
///
/// Joints with zero velocity (or acceleration) are left out of the
/// corresponding mean instead of pulling it toward zero. Returns `None`
/// when no joint is present.
pub fn body_features<'a, I>(joints: I) -> Option<BodyFeatures>
where
    I: IntoIterator<Item = &'a Kinematics>,
{
    let mut count = 0usize;
    let mut position_sum = Vec3::ZERO;
    let mut velocity_sum = 0.0f32;
    let mut velocity_count = 0usize;
    let mut acceleration_sum = 0.0f32;
    let mut acceleration_count = 0usize;
    let mut energy = 0.0f32;

    for joint in joints {
        count += 1;
        position_sum = position_sum + joint.position;

        let speed = joint.velocity.magnitude;
        if speed > 0.0 {
            velocity_sum += speed;
            velocity_count += 1;
            energy += speed * speed;
        }

        let accel = joint.acceleration.magnitude;
        if accel > 0.0 {
            acceleration_sum += accel;
            acceleration_count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let overall_velocity = mean(velocity_sum, velocity_count);
    Some(BodyFeatures {
        center_of_mass: position_sum.scale(1.0 / count as f32),
        overall_velocity,
        overall_acceleration: mean(acceleration_sum, acceleration_count),
        activity_level: overall_velocity,
        energy,
    })
}

fn mean(sum: f32, count: usize) -> f32 {
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}
