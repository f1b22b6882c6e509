use crate::config::{BicepCurlConfig, Config};
use crate::feedback::FeedbackItem;
use crate::geometry::{angle_at, mean};
use crate::pose::{KeypointIndex, Pose};

use super::{visibility_gate, AnalysisResult, Assessment, ExerciseAnalyzer, ExerciseKind, Phase};

const NOT_IN_FRAME: &str = "⚠️ Show upper body - arms visible";

/// Bicep curl: contraction from the average elbow angle, elbow stability
/// against the torso and momentum at the top.
///
/// `Up` means fully curled; everything else reports `Down`.
#[derive(Debug, Clone)]
pub struct BicepCurlAnalyzer {
    config: BicepCurlConfig,
    confidence_threshold: f32,
}

impl BicepCurlAnalyzer {
    pub fn new(config: BicepCurlConfig, confidence_threshold: f32) -> Self {
        Self {
            config,
            confidence_threshold,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.bicep_curl.clone(), config.engine.confidence_threshold)
    }

    /// Elbow height as a fraction of the shoulder-to-hip span (0 at the
    /// shoulders, 1 at the hips). `None` when the hips are not tracked or
    /// the span collapses.
    fn elbow_position(&self, pose: &Pose) -> Option<f32> {
        let left_hip = pose.get(KeypointIndex::LeftHip);
        let right_hip = pose.get(KeypointIndex::RightHip);
        if !left_hip.is_visible(self.confidence_threshold)
            || !right_hip.is_visible(self.confidence_threshold)
        {
            return None;
        }
        let shoulder_y = mean(
            pose.get(KeypointIndex::LeftShoulder).y,
            pose.get(KeypointIndex::RightShoulder).y,
        );
        let elbow_y = mean(
            pose.get(KeypointIndex::LeftElbow).y,
            pose.get(KeypointIndex::RightElbow).y,
        );
        let span = mean(left_hip.y, right_hip.y) - shoulder_y;
        if span.abs() < f32::EPSILON {
            return None;
        }
        Some((elbow_y - shoulder_y) / span)
    }
}

impl ExerciseAnalyzer for BicepCurlAnalyzer {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::BicepCurl
    }

    fn analyze(&self, pose: &Pose) -> AnalysisResult {
        let threshold = self.confidence_threshold;
        if let Some(gated) = visibility_gate(self.kind(), pose, threshold, NOT_IN_FRAME) {
            return gated;
        }
        let c = &self.config;

        let left_shoulder = pose.get(KeypointIndex::LeftShoulder);
        let right_shoulder = pose.get(KeypointIndex::RightShoulder);
        let left_wrist = pose.get(KeypointIndex::LeftWrist);
        let right_wrist = pose.get(KeypointIndex::RightWrist);

        let elbow_angle = mean(
            angle_at(left_shoulder, pose.get(KeypointIndex::LeftElbow), left_wrist, threshold),
            angle_at(right_shoulder, pose.get(KeypointIndex::RightElbow), right_wrist, threshold),
        );

        let mut assessment = Assessment::new();

        let phase = if elbow_angle < c.top_angle {
            assessment.note(FeedbackItem::good(
                "🎯 PERFECT! Full bicep contraction at top",
                1,
            ));
            Phase::Up
        } else if elbow_angle < c.partial_angle {
            assessment.deduct(
                FeedbackItem::warning("⚠️ CURL HIGHER - bring to shoulders", 1),
                c.partial_curl_deduction,
            );
            Phase::Down
        } else if elbow_angle > c.extended_angle {
            assessment.note(FeedbackItem::good(
                "✅ Good starting position - arms extended",
                1,
            ));
            Phase::Down
        } else {
            assessment.note(FeedbackItem::info("💡 Either curl up or extend down fully", 1));
            Phase::Down
        };

        if let Some(position) = self.elbow_position(pose) {
            if position < c.elbow_band_min || position > c.elbow_band_max {
                assessment.deduct(
                    FeedbackItem::error("❌ ELBOWS MOVING! Keep them locked at sides", 2),
                    c.elbow_drift_deduction,
                );
            } else {
                assessment.note(FeedbackItem::good("✅ Perfect - elbows stable at sides", 2));
            }
        }

        // Wrists above the shoulders at the top of the curl means momentum
        let wrist_y = mean(left_wrist.y, right_wrist.y);
        let shoulder_y = mean(left_shoulder.y, right_shoulder.y);
        if wrist_y < shoulder_y && elbow_angle < c.top_angle {
            assessment.deduct(
                FeedbackItem::warning("⚠️ Don't swing the weight - control it", 3),
                c.swing_deduction,
            );
        }

        assessment.note(FeedbackItem::info(
            format!(
                "📐 Elbow Angle: {}° | Full curl: <{}°",
                elbow_angle.round(),
                c.top_angle
            ),
            5,
        ));

        assessment.finish(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::test_support::{faint_pose, limb_end, make_pose};
    use crate::feedback::Severity;
    use crate::pose::Keypoint;
    use crate::pose::KeypointIndex::*;

    /// Upper arms hang from shoulders at y=100 to elbows at `elbow_y`;
    /// forearms of `forearm` px bend to `elbow_angle`. Hips at y=300.
    fn curl_pose(elbow_angle: f32, elbow_y: f32, forearm: f32) -> Pose {
        let left_shoulder = (250.0, 100.0);
        let right_shoulder = (350.0, 100.0);
        let left_elbow = (250.0, elbow_y);
        let right_elbow = (350.0, elbow_y);
        let left_wrist = limb_end(left_shoulder, left_elbow, elbow_angle, forearm);
        let right_wrist = limb_end(right_shoulder, right_elbow, -elbow_angle, forearm);
        make_pose(&[
            (LeftShoulder, left_shoulder.0, left_shoulder.1),
            (RightShoulder, right_shoulder.0, right_shoulder.1),
            (LeftElbow, left_elbow.0, left_elbow.1),
            (RightElbow, right_elbow.0, right_elbow.1),
            (LeftWrist, left_wrist.0, left_wrist.1),
            (RightWrist, right_wrist.0, right_wrist.1),
            (LeftHip, 260.0, 300.0),
            (RightHip, 340.0, 300.0),
        ])
    }

    fn analyze(pose: &Pose) -> AnalysisResult {
        BicepCurlAnalyzer::from_config(&Config::default()).analyze(pose)
    }

    #[test]
    fn test_full_contraction_is_up() {
        let result = analyze(&curl_pose(30.0, 200.0, 80.0));
        assert_eq!(result.phase, Phase::Up);
        assert_eq!(result.score, 100);
        assert!(result.feedback.contains_message("Full bicep contraction"));
        assert!(result.feedback.contains_message("elbows stable"));
    }

    #[test]
    fn test_extended_arms_are_down() {
        let result = analyze(&curl_pose(175.0, 200.0, 80.0));
        assert_eq!(result.phase, Phase::Down);
        assert_eq!(result.score, 100);
        assert!(result.feedback.contains_message("Good starting position"));
    }

    #[test]
    fn test_partial_curl_deducts() {
        let result = analyze(&curl_pose(70.0, 200.0, 80.0));
        assert_eq!(result.phase, Phase::Down);
        assert_eq!(result.score, 85);
        assert!(result.feedback.contains_message("CURL HIGHER"));
    }

    #[test]
    fn test_midrange_is_informational() {
        let result = analyze(&curl_pose(120.0, 200.0, 80.0));
        assert_eq!(result.phase, Phase::Down);
        assert_eq!(result.score, 100);
        assert_eq!(result.feedback.first().unwrap().severity, Severity::Info);
    }

    #[test]
    fn test_elbow_drift() {
        // Elbows at 25% of the shoulder-hip span
        let result = analyze(&curl_pose(175.0, 150.0, 80.0));
        assert!(result.feedback.contains_message("ELBOWS MOVING"));
        assert_eq!(result.score, 75);

        // And at 85%
        let result = analyze(&curl_pose(175.0, 270.0, 80.0));
        assert!(result.feedback.contains_message("ELBOWS MOVING"));
    }

    #[test]
    fn test_swinging_at_top() {
        // Long forearm carries the wrists above the shoulder line
        let result = analyze(&curl_pose(30.0, 200.0, 120.0));
        assert_eq!(result.phase, Phase::Up);
        assert!(result.feedback.contains_message("Don't swing the weight"));
        assert_eq!(result.score, 85);
    }

    #[test]
    fn test_elbow_check_skipped_without_hips() {
        let mut pose = curl_pose(175.0, 150.0, 80.0);
        pose.set(LeftHip, Keypoint::MISSING);
        let result = analyze(&pose);
        assert!(result.in_position);
        assert_eq!(result.score, 100);
        assert!(!result.feedback.contains_message("ELBOWS"));
        assert!(!result.feedback.is_empty());
    }

    #[test]
    fn test_hidden_wrist_gates_to_down() {
        let mut pose = curl_pose(30.0, 200.0, 80.0);
        pose.set(RightWrist, Keypoint::new(350.0, 130.0, 0.2));
        let result = analyze(&pose);
        assert!(!result.in_position);
        assert_eq!(result.phase, Phase::Down);
        assert_eq!(result.feedback.items()[0].message, NOT_IN_FRAME);
    }

    #[test]
    fn test_faint_pose() {
        assert_eq!(analyze(&faint_pose()).score, 0);
    }
}
