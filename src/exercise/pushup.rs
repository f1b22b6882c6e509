use crate::config::{Config, PushupConfig};
use crate::feedback::FeedbackItem;
use crate::geometry::{angle_at, mean};
use crate::pose::{KeypointIndex, Pose};

use super::{visibility_gate, AnalysisResult, Assessment, ExerciseAnalyzer, ExerciseKind, Phase};

const NOT_IN_FRAME: &str = "⚠️ Get into push-up position (plank)";

/// Push-up depth from the average elbow angle, plus body line and elbow flare
#[derive(Debug, Clone)]
pub struct PushupAnalyzer {
    config: PushupConfig,
    confidence_threshold: f32,
}

impl PushupAnalyzer {
    pub fn new(config: PushupConfig, confidence_threshold: f32) -> Self {
        Self {
            config,
            confidence_threshold,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pushup.clone(), config.engine.confidence_threshold)
    }
}

impl ExerciseAnalyzer for PushupAnalyzer {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Pushup
    }

    fn analyze(&self, pose: &Pose) -> AnalysisResult {
        let threshold = self.confidence_threshold;
        if let Some(gated) = visibility_gate(self.kind(), pose, threshold, NOT_IN_FRAME) {
            return gated;
        }
        let c = &self.config;

        let left_shoulder = pose.get(KeypointIndex::LeftShoulder);
        let right_shoulder = pose.get(KeypointIndex::RightShoulder);
        let left_elbow = pose.get(KeypointIndex::LeftElbow);
        let right_elbow = pose.get(KeypointIndex::RightElbow);
        let left_wrist = pose.get(KeypointIndex::LeftWrist);
        let right_wrist = pose.get(KeypointIndex::RightWrist);
        let left_hip = pose.get(KeypointIndex::LeftHip);
        let right_hip = pose.get(KeypointIndex::RightHip);

        let elbow_angle = mean(
            angle_at(left_shoulder, left_elbow, left_wrist, threshold),
            angle_at(right_shoulder, right_elbow, right_wrist, threshold),
        );
        // Positive when the hips hang below the shoulder line
        let hip_drop = mean(left_hip.y, right_hip.y) - mean(left_shoulder.y, right_shoulder.y);

        let mut assessment = Assessment::new();

        let phase = if elbow_angle < c.down_angle {
            assessment.note(FeedbackItem::good("🎯 EXCELLENT! Perfect push-up depth", 1));
            Phase::Down
        } else if elbow_angle < c.up_angle {
            assessment.deduct(
                FeedbackItem::warning("⚠️ GO LOWER - bend elbows to 90°", 1),
                c.shallow_deduction,
            );
            Phase::Up
        } else {
            assessment.note(FeedbackItem::info("💡 Lower your chest toward the ground", 1));
            Phase::Up
        };

        if hip_drop > c.hip_offset_px {
            assessment.deduct(
                FeedbackItem::error("❌ HIPS SAGGING! Engage your core", 2),
                c.hip_sag_deduction,
            );
        } else if hip_drop < -c.hip_offset_px {
            assessment.deduct(
                FeedbackItem::error("❌ HIPS TOO HIGH! Lower them down", 2),
                c.hip_high_deduction,
            );
        } else {
            assessment.note(FeedbackItem::good(
                "✅ Perfect body alignment - straight line",
                2,
            ));
        }

        let elbow_width = (left_elbow.x - right_elbow.x).abs();
        let shoulder_width = (left_shoulder.x - right_shoulder.x).abs();
        if elbow_width > shoulder_width * c.elbow_flare_ratio {
            assessment.deduct(
                FeedbackItem::warning("⚠️ Elbows flaring out - keep them at 45°", 3),
                c.elbow_flare_deduction,
            );
        } else {
            assessment.note(FeedbackItem::good("✅ Good elbow position", 3));
        }

        assessment.note(FeedbackItem::info(
            format!(
                "📐 Elbow Angle: {}° | Target: <{}° at bottom",
                elbow_angle.round(),
                c.down_angle
            ),
            5,
        ));
        if phase == Phase::Down {
            assessment.note(FeedbackItem::info("🔥 Great! Now push back up", 6));
        }

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

    /// Arms bent to `elbow_angle`, elbows `elbow_spread` px either side of
    /// the shoulder midpoint, hips `hip_drop` px below the shoulder line.
    fn pushup_pose(elbow_angle: f32, elbow_spread: f32, hip_drop: f32) -> Pose {
        let left_shoulder = (250.0, 200.0);
        let right_shoulder = (350.0, 200.0);
        let left_elbow = (300.0 - elbow_spread, 260.0);
        let right_elbow = (300.0 + elbow_spread, 260.0);
        let left_wrist = limb_end(left_shoulder, left_elbow, elbow_angle, 60.0);
        let right_wrist = limb_end(right_shoulder, right_elbow, -elbow_angle, 60.0);
        make_pose(&[
            (LeftShoulder, left_shoulder.0, left_shoulder.1),
            (RightShoulder, right_shoulder.0, right_shoulder.1),
            (LeftElbow, left_elbow.0, left_elbow.1),
            (RightElbow, right_elbow.0, right_elbow.1),
            (LeftWrist, left_wrist.0, left_wrist.1),
            (RightWrist, right_wrist.0, right_wrist.1),
            (LeftHip, 260.0, 200.0 + hip_drop),
            (RightHip, 340.0, 200.0 + hip_drop),
        ])
    }

    fn analyze(pose: &Pose) -> AnalysisResult {
        PushupAnalyzer::from_config(&Config::default()).analyze(pose)
    }

    #[test]
    fn test_bottom_position_is_down() {
        let result = analyze(&pushup_pose(90.0, 50.0, 0.0));
        assert_eq!(result.phase, Phase::Down);
        assert_eq!(result.score, 100);
        assert!(result.feedback.contains_message("Perfect push-up depth"));
        assert!(result.feedback.contains_message("Now push back up"));
        assert!(result.feedback.contains_message("Elbow Angle: 90°"));
    }

    #[test]
    fn test_locked_out_is_up() {
        let result = analyze(&pushup_pose(170.0, 50.0, 0.0));
        assert_eq!(result.phase, Phase::Up);
        assert_eq!(result.score, 100);
        assert_eq!(result.feedback.first().unwrap().severity, Severity::Info);
    }

    #[test]
    fn test_half_rep_is_up_with_deduction() {
        let result = analyze(&pushup_pose(120.0, 50.0, 0.0));
        assert_eq!(result.phase, Phase::Up);
        assert_eq!(result.score, 80);
        assert!(result.feedback.contains_message("GO LOWER"));
    }

    #[test]
    fn test_sagging_hips() {
        let result = analyze(&pushup_pose(170.0, 50.0, 60.0));
        assert!(result.feedback.contains_message("HIPS SAGGING"));
        assert_eq!(result.score, 75);
    }

    #[test]
    fn test_piked_hips() {
        let result = analyze(&pushup_pose(170.0, 50.0, -60.0));
        assert!(result.feedback.contains_message("HIPS TOO HIGH"));
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_hip_offset_at_limit_is_aligned() {
        let result = analyze(&pushup_pose(170.0, 50.0, 50.0));
        assert!(result.feedback.contains_message("Perfect body alignment"));
    }

    #[test]
    fn test_elbow_flare() {
        // Elbows 160 px apart against 100 px shoulders
        let result = analyze(&pushup_pose(170.0, 80.0, 0.0));
        assert!(result.feedback.contains_message("Elbows flaring out"));
        assert_eq!(result.score, 85);
    }

    #[test]
    fn test_checks_are_independent() {
        let result = analyze(&pushup_pose(120.0, 80.0, 60.0));
        assert_eq!(result.score, 100 - 20 - 25 - 15);
        assert_eq!(result.feedback.count_severity(Severity::Warning), 2);
        assert_eq!(result.feedback.count_severity(Severity::Error), 1);
    }

    #[test]
    fn test_hidden_hip_gates_analysis() {
        let mut pose = pushup_pose(90.0, 50.0, 0.0);
        pose.set(LeftHip, Keypoint::new(260.0, 200.0, 0.3));
        let result = analyze(&pose);
        assert!(!result.in_position);
        assert_eq!(result.score, 0);
        assert_eq!(result.phase, Phase::Up);
        assert_eq!(result.feedback.items()[0].message, NOT_IN_FRAME);
    }

    #[test]
    fn test_faint_pose() {
        let result = analyze(&faint_pose());
        assert_eq!(result.feedback.len(), 1);
        assert_eq!(result.score, 0);
    }
}
