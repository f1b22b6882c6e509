use crate::error::{FormError, Result};

/// MoveNet 17-point landmark indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub const ALL: [KeypointIndex; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

/// A single tracked landmark.
///
/// Coordinates are image pixels as reported by the pose estimator, with the
/// origin at the top-left corner and `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Detection score (0.0 to 1.0)
    pub confidence: f32,
}

impl Keypoint {
    /// Stand-in for a joint the estimator did not resolve.
    pub const MISSING: Keypoint = Keypoint {
        x: 0.0,
        y: 0.0,
        confidence: 0.0,
    };

    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Confidence at or above the threshold
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }

    /// Confidence strictly above the threshold, the rule used by visibility gates
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }
}

impl Default for Keypoint {
    fn default() -> Self {
        Self::MISSING
    }
}

/// One frame of 17 keypoints, indexed positionally by `KeypointIndex`
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub keypoints: [Keypoint; KeypointIndex::COUNT],
}

impl Pose {
    pub fn new(keypoints: [Keypoint; KeypointIndex::COUNT]) -> Self {
        Self { keypoints }
    }

    /// Build a pose from an estimator output of arbitrary length.
    ///
    /// Anything other than exactly 17 entries is a contract violation by the
    /// caller and is rejected rather than padded.
    pub fn try_from_slice(keypoints: &[Keypoint]) -> Result<Self> {
        let keypoints: [Keypoint; KeypointIndex::COUNT] =
            keypoints
                .try_into()
                .map_err(|_| FormError::KeypointCount {
                    expected: KeypointIndex::COUNT,
                    actual: keypoints.len(),
                })?;
        Ok(Self { keypoints })
    }

    pub fn get(&self, index: KeypointIndex) -> &Keypoint {
        &self.keypoints[index as usize]
    }

    pub fn set(&mut self, index: KeypointIndex, keypoint: Keypoint) {
        self.keypoints[index as usize] = keypoint;
    }

    /// First of `joints` whose confidence is not strictly above the threshold
    pub fn first_hidden(&self, joints: &[KeypointIndex], threshold: f32) -> Option<KeypointIndex> {
        joints
            .iter()
            .copied()
            .find(|&j| !self.get(j).is_visible(threshold))
    }

    /// Number of keypoints with confidence strictly above the threshold
    pub fn visible_count(&self, threshold: f32) -> usize {
        self.keypoints
            .iter()
            .filter(|k| k.is_visible(threshold))
            .count()
    }

    pub fn average_confidence(&self) -> f32 {
        let sum: f32 = self.keypoints.iter().map(|k| k.confidence).sum();
        sum / KeypointIndex::COUNT as f32
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            keypoints: [Keypoint::MISSING; KeypointIndex::COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_index_count() {
        assert_eq!(KeypointIndex::COUNT, 17);
        for (i, idx) in KeypointIndex::ALL.iter().enumerate() {
            assert_eq!(*idx as usize, i);
        }
    }

    #[test]
    fn test_keypoint_index_from_index() {
        assert_eq!(KeypointIndex::from_index(0), Some(KeypointIndex::Nose));
        assert_eq!(KeypointIndex::from_index(16), Some(KeypointIndex::RightAnkle));
        assert_eq!(KeypointIndex::from_index(17), None);
    }

    #[test]
    fn test_keypoint_visibility_is_strict() {
        let kp = Keypoint::new(10.0, 10.0, 0.3);
        assert!(kp.is_valid(0.3));
        assert!(!kp.is_visible(0.3));
        assert!(Keypoint::new(10.0, 10.0, 0.31).is_visible(0.3));
    }

    #[test]
    fn test_missing_sentinel_has_zero_confidence() {
        assert_eq!(Keypoint::default().confidence, 0.0);
        assert_eq!(Pose::default().visible_count(0.0), 0);
    }

    #[test]
    fn test_pose_get_and_set() {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::Nose, Keypoint::new(320.0, 80.0, 0.9));
        let nose = pose.get(KeypointIndex::Nose);
        assert_eq!(nose.x, 320.0);
        assert_eq!(nose.y, 80.0);
        assert_eq!(nose.confidence, 0.9);
    }

    #[test]
    fn test_pose_try_from_slice_rejects_wrong_length() {
        let short = vec![Keypoint::new(0.0, 0.0, 1.0); 12];
        match Pose::try_from_slice(&short) {
            Err(FormError::KeypointCount { expected, actual }) => {
                assert_eq!(expected, 17);
                assert_eq!(actual, 12);
            }
            other => panic!("expected KeypointCount error, got {:?}", other),
        }

        let exact = vec![Keypoint::new(1.0, 2.0, 0.5); 17];
        let pose = Pose::try_from_slice(&exact).unwrap();
        assert_eq!(pose.get(KeypointIndex::RightAnkle).y, 2.0);
    }

    #[test]
    fn test_pose_visible_count_and_average() {
        let mut keypoints = [Keypoint::new(0.0, 0.0, 0.5); KeypointIndex::COUNT];
        keypoints[0].confidence = 0.1;
        keypoints[1].confidence = 0.3;
        let pose = Pose::new(keypoints);
        assert_eq!(pose.visible_count(0.3), 15);
        assert_eq!(pose.first_hidden(&[KeypointIndex::LeftHip, KeypointIndex::RightHip], 0.3), None);
        assert_eq!(
            pose.first_hidden(&[KeypointIndex::LeftHip, KeypointIndex::Nose], 0.3),
            Some(KeypointIndex::Nose)
        );
        let expected = (15.0 * 0.5 + 0.1 + 0.3) / 17.0;
        assert!((pose.average_confidence() - expected).abs() < 0.001);
    }
}
