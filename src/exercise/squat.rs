use crate::config::{Config, SquatConfig};
use crate::feedback::FeedbackItem;
use crate::geometry::{angle_at, mean};
use crate::pose::{KeypointIndex, Pose};

use super::{visibility_gate, AnalysisResult, Assessment, ExerciseAnalyzer, ExerciseKind, Phase};

const NOT_IN_FRAME: &str = "⚠️ Move into frame - show full body";

/// Squat depth and alignment.
///
/// Depth comes from the average knee angle (hip-knee-ankle). The "below
/// parallel" bonus compares averaged knee and hip `y` in the estimator's image
/// coordinates (origin top-left, `y` growing downward) and fires when
/// `knee_y - hip_y > 0`.
#[derive(Debug, Clone)]
pub struct SquatAnalyzer {
    config: SquatConfig,
    confidence_threshold: f32,
}

impl SquatAnalyzer {
    pub fn new(config: SquatConfig, confidence_threshold: f32) -> Self {
        Self {
            config,
            confidence_threshold,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.squat.clone(), config.engine.confidence_threshold)
    }
}

impl ExerciseAnalyzer for SquatAnalyzer {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Squat
    }

    fn analyze(&self, pose: &Pose) -> AnalysisResult {
        let threshold = self.confidence_threshold;
        if let Some(gated) = visibility_gate(self.kind(), pose, threshold, NOT_IN_FRAME) {
            return gated;
        }
        let c = &self.config;

        let left_hip = pose.get(KeypointIndex::LeftHip);
        let right_hip = pose.get(KeypointIndex::RightHip);
        let left_knee = pose.get(KeypointIndex::LeftKnee);
        let right_knee = pose.get(KeypointIndex::RightKnee);
        let left_ankle = pose.get(KeypointIndex::LeftAnkle);
        let right_ankle = pose.get(KeypointIndex::RightAnkle);

        let knee_angle = mean(
            angle_at(left_hip, left_knee, left_ankle, threshold),
            angle_at(right_hip, right_knee, right_ankle, threshold),
        );
        let hip_knee_drop = mean(left_knee.y, right_knee.y) - mean(left_hip.y, right_hip.y);

        let mut assessment = Assessment::new();

        let phase = if knee_angle < c.down_angle {
            if hip_knee_drop > 0.0 {
                assessment.note(FeedbackItem::good(
                    "🎯 EXCELLENT! Hips below parallel - perfect depth",
                    1,
                ));
            } else if knee_angle < c.great_depth_angle {
                assessment.note(FeedbackItem::good("✅ Great depth! Keep going", 1));
            } else {
                assessment.note(FeedbackItem::good("✅ Good squat position", 1));
            }
            Phase::Down
        } else if knee_angle < c.up_angle {
            assessment.deduct(
                FeedbackItem::warning("⚠️ GO DEEPER - aim for 90° knee bend", 1),
                c.shallow_deduction,
            );
            Phase::Up
        } else {
            assessment.note(FeedbackItem::info("💡 Begin your squat - bend those knees", 1));
            Phase::Up
        };
        let is_down = phase == Phase::Down;

        // Knee valgus only matters under load
        if is_down {
            let knee_width = (left_knee.x - right_knee.x).abs();
            let ankle_width = (left_ankle.x - right_ankle.x).abs();
            if knee_width < ankle_width * c.knee_cave_ratio {
                assessment.deduct(
                    FeedbackItem::error("❌ KNEES CAVING IN - push them outward!", 2),
                    c.knee_cave_deduction,
                );
            } else {
                assessment.note(FeedbackItem::good("✅ Perfect knee tracking", 2));
            }
        }

        let nose = pose.get(KeypointIndex::Nose);
        let left_shoulder = pose.get(KeypointIndex::LeftShoulder);
        let right_shoulder = pose.get(KeypointIndex::RightShoulder);
        if nose.is_visible(threshold)
            && left_shoulder.is_visible(threshold)
            && right_shoulder.is_visible(threshold)
        {
            let head_forward = (nose.x - mean(left_shoulder.x, right_shoulder.x)).abs();
            if head_forward > c.head_forward_error_px {
                assessment.deduct(
                    FeedbackItem::error("❌ CHEST UP! You're leaning too far forward", 3),
                    c.head_forward_error_deduction,
                );
            } else if head_forward > c.head_forward_warning_px {
                assessment.deduct(
                    FeedbackItem::warning("⚠️ Keep chest more upright", 3),
                    c.head_forward_warning_deduction,
                );
            } else {
                assessment.note(FeedbackItem::good(
                    "✅ Perfect posture - chest up, back straight",
                    3,
                ));
            }
        }

        if is_down {
            let left_forward = (left_knee.x - left_ankle.x).abs();
            let right_forward = (right_knee.x - right_ankle.x).abs();
            if left_forward > c.knee_forward_px || right_forward > c.knee_forward_px {
                assessment.deduct(
                    FeedbackItem::warning("⚠️ Knees too far forward - sit back more", 4),
                    c.knee_forward_deduction,
                );
            }
        }

        assessment.note(FeedbackItem::info(
            format!(
                "📐 Knee Angle: {}° | Target: <{}° for deep squat",
                knee_angle.round(),
                c.down_angle
            ),
            5,
        ));
        if is_down {
            assessment.note(FeedbackItem::info(
                "🔥 Hold this position - you're in the squat!",
                6,
            ));
        }

        assessment.finish(phase)
    }
}
