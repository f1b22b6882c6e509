use crate::exercise::ExerciseKind;
use crate::pose::{KeypointIndex, Pose};

/// Bones of the 17-point skeleton as (start, end) pairs
pub const SKELETON_CONNECTIONS: [(KeypointIndex, KeypointIndex); 16] = [
    // Face
    (KeypointIndex::LeftEar, KeypointIndex::LeftEye),
    (KeypointIndex::LeftEye, KeypointIndex::Nose),
    (KeypointIndex::Nose, KeypointIndex::RightEye),
    (KeypointIndex::RightEye, KeypointIndex::RightEar),
    // Arms
    (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftElbow),
    (KeypointIndex::LeftElbow, KeypointIndex::LeftWrist),
    (KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
    (KeypointIndex::RightElbow, KeypointIndex::RightWrist),
    // Torso
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftHip),
    (KeypointIndex::RightShoulder, KeypointIndex::RightHip),
    (KeypointIndex::LeftHip, KeypointIndex::RightHip),
    // Legs
    (KeypointIndex::LeftHip, KeypointIndex::LeftKnee),
    (KeypointIndex::LeftKnee, KeypointIndex::LeftAnkle),
    (KeypointIndex::RightHip, KeypointIndex::RightKnee),
    (KeypointIndex::RightKnee, KeypointIndex::RightAnkle),
];

const PLANK_HIGHLIGHT: &[KeypointIndex] = &[
    KeypointIndex::LeftShoulder,
    KeypointIndex::RightShoulder,
    KeypointIndex::LeftElbow,
    KeypointIndex::RightElbow,
    KeypointIndex::LeftHip,
    KeypointIndex::RightHip,
    KeypointIndex::LeftAnkle,
    KeypointIndex::RightAnkle,
];

/// Joints an overlay should emphasise for the exercise.
///
/// Plank also marks the elbows and ankles even though they are not required
/// for analysis.
pub fn highlighted_joints(kind: ExerciseKind) -> &'static [KeypointIndex] {
    match kind {
        ExerciseKind::Plank => PLANK_HIGHLIGHT,
        other => other.critical_joints(),
    }
}

/// Bones whose both ends are visible in `pose`
pub fn visible_bones(
    pose: &Pose,
    threshold: f32,
) -> impl Iterator<Item = (KeypointIndex, KeypointIndex)> + '_ {
    SKELETON_CONNECTIONS.iter().copied().filter(move |&(a, b)| {
        pose.get(a).is_visible(threshold) && pose.get(b).is_visible(threshold)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    #[test]
    fn test_connections_are_distinct_and_non_degenerate() {
        for (i, &(a, b)) in SKELETON_CONNECTIONS.iter().enumerate() {
            assert_ne!(a, b);
            for &(c, d) in &SKELETON_CONNECTIONS[i + 1..] {
                assert!(!((a, b) == (c, d) || (a, b) == (d, c)));
            }
        }
    }

    #[test]
    fn test_every_keypoint_is_connected() {
        for idx in KeypointIndex::ALL {
            assert!(SKELETON_CONNECTIONS
                .iter()
                .any(|&(a, b)| a == idx || b == idx));
        }
    }

    #[test]
    fn test_plank_highlight_indices() {
        let indices: Vec<usize> = highlighted_joints(ExerciseKind::Plank)
            .iter()
            .map(|&k| k as usize)
            .collect();
        assert_eq!(indices, vec![5, 6, 7, 8, 11, 12, 15, 16]);
    }

    #[test]
    fn test_other_exercises_highlight_critical_joints() {
        for kind in [ExerciseKind::Squat, ExerciseKind::Pushup, ExerciseKind::BicepCurl] {
            assert_eq!(highlighted_joints(kind), kind.critical_joints());
        }
    }

    #[test]
    fn test_visible_bones() {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::LeftHip, Keypoint::new(0.0, 0.0, 0.9));
        pose.set(KeypointIndex::LeftKnee, Keypoint::new(0.0, 10.0, 0.9));
        pose.set(KeypointIndex::LeftAnkle, Keypoint::new(0.0, 20.0, 0.2));
        let bones: Vec<_> = visible_bones(&pose, 0.3).collect();
        assert_eq!(bones, vec![(KeypointIndex::LeftHip, KeypointIndex::LeftKnee)]);
    }
}
