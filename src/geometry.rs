//! Joint angle computation over 2-D keypoints.

use crate::pose::Keypoint;

/// Returned whenever a joint cannot be measured: reads as "fully extended",
/// so unreliable tracking never looks like a deep bend.
pub const UNMEASURED_ANGLE: f32 = 180.0;

/// Unsigned angle in degrees at vertex `b`, between rays `b→a` and `b→c`.
///
/// The result lies in `[0, 180]`. If any of the three points is missing or
/// below `min_confidence`, `UNMEASURED_ANGLE` is returned.
pub fn joint_angle(
    a: Option<&Keypoint>,
    b: Option<&Keypoint>,
    c: Option<&Keypoint>,
    min_confidence: f32,
) -> f32 {
    let (a, b, c) = match (a, b, c) {
        (Some(a), Some(b), Some(c))
            if a.is_valid(min_confidence)
                && b.is_valid(min_confidence)
                && c.is_valid(min_confidence) =>
        {
            (a, b, c)
        }
        _ => return UNMEASURED_ANGLE,
    };

    // Difference of absolute bearings; stable near the 0/360 wrap
    let radians = f32::atan2(c.y - b.y, c.x - b.x) - f32::atan2(a.y - b.y, a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle.clamp(0.0, 180.0)
}

/// `joint_angle` for three keypoints that are always present in a frame
pub fn angle_at(a: &Keypoint, b: &Keypoint, c: &Keypoint, min_confidence: f32) -> f32 {
    joint_angle(Some(a), Some(b), Some(c), min_confidence)
}

pub fn mean(a: f32, b: f32) -> f32 {
    (a + b) / 2.0
}
