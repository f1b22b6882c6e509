use crate::config::{Config, PlankConfig};
use crate::feedback::FeedbackItem;
use crate::geometry::mean;
use crate::pose::{KeypointIndex, Pose};

use super::{visibility_gate, AnalysisResult, Assessment, ExerciseAnalyzer, ExerciseKind, Phase};

const NOT_IN_FRAME: &str = "⚠️ Get into plank position";

/// Plank hold. There are no reps; the phase is always `Holding` and only the
/// body line and elbow stacking are scored.
#[derive(Debug, Clone)]
pub struct PlankAnalyzer {
    config: PlankConfig,
    confidence_threshold: f32,
}

impl PlankAnalyzer {
    pub fn new(config: PlankConfig, confidence_threshold: f32) -> Self {
        Self {
            config,
            confidence_threshold,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.plank.clone(), config.engine.confidence_threshold)
    }
}

impl ExerciseAnalyzer for PlankAnalyzer {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Plank
    }

    fn analyze(&self, pose: &Pose) -> AnalysisResult {
        let threshold = self.confidence_threshold;
        if let Some(gated) = visibility_gate(self.kind(), pose, threshold, NOT_IN_FRAME) {
            return gated;
        }
        let c = &self.config;

        let left_shoulder = pose.get(KeypointIndex::LeftShoulder);
        let right_shoulder = pose.get(KeypointIndex::RightShoulder);
        let shoulder_y = mean(left_shoulder.y, right_shoulder.y);
        let hip_y = mean(
            pose.get(KeypointIndex::LeftHip).y,
            pose.get(KeypointIndex::RightHip).y,
        );
        let hip_drop = hip_y - shoulder_y;

        let mut assessment = Assessment::new();

        if hip_drop > c.hip_offset_px {
            assessment.deduct(
                FeedbackItem::error("❌ HIPS SAGGING! Lift them up - engage core", 1),
                c.hip_sag_deduction,
            );
        } else if hip_drop < -c.hip_offset_px {
            assessment.deduct(
                FeedbackItem::error("❌ HIPS TOO HIGH! Lower them down", 1),
                c.hip_high_deduction,
            );
        } else if hip_drop.abs() < c.straight_line_px {
            assessment.note(FeedbackItem::good(
                "🎯 PERFECT PLANK! Body in straight line",
                1,
            ));
        } else {
            assessment.note(FeedbackItem::good("✅ Good plank position", 1));
        }

        // Elbows are optional; the stacking check runs only when both are tracked
        let left_elbow = pose.get(KeypointIndex::LeftElbow);
        let right_elbow = pose.get(KeypointIndex::RightElbow);
        if left_elbow.is_visible(threshold) && right_elbow.is_visible(threshold) {
            let elbow_x = mean(left_elbow.x, right_elbow.x);
            let shoulder_x = mean(left_shoulder.x, right_shoulder.x);
            if (elbow_x - shoulder_x).abs() < c.elbow_alignment_px {
                assessment.note(FeedbackItem::good("✅ Shoulders directly over elbows", 2));
            } else {
                assessment.deduct(
                    FeedbackItem::warning("⚠️ Align shoulders over elbows", 2),
                    c.elbow_alignment_deduction,
                );
            }
        }

        assessment.note(FeedbackItem::info("💪 Keep core tight - breathe steadily", 3));
        assessment.note(FeedbackItem::info(
            "🔥 Hold this position - you're doing great!",
            4,
        ));

        assessment.finish(Phase::Holding)
    }
}
