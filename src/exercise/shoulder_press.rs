use crate::config::{Config, ShoulderPressConfig};
use crate::feedback::FeedbackItem;
use crate::geometry::{angle_at, mean};
use crate::pose::{KeypointIndex, Pose};

use super::{visibility_gate, AnalysisResult, Assessment, ExerciseAnalyzer, ExerciseKind, Phase};

const NOT_IN_FRAME: &str = "⚠️ Show upper body clearly";

/// Overhead press: lockout needs the wrists well above the shoulders and the
/// elbows nearly straight.
#[derive(Debug, Clone)]
pub struct ShoulderPressAnalyzer {
    config: ShoulderPressConfig,
    confidence_threshold: f32,
}

impl ShoulderPressAnalyzer {
    pub fn new(config: ShoulderPressConfig, confidence_threshold: f32) -> Self {
        Self {
            config,
            confidence_threshold,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.shoulder_press.clone(), config.engine.confidence_threshold)
    }
}

impl ExerciseAnalyzer for ShoulderPressAnalyzer {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::ShoulderPress
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

        // Image y grows downward: positive means wrists above shoulders
        let wrist_height = mean(left_shoulder.y, right_shoulder.y) - mean(left_wrist.y, right_wrist.y);
        let elbow_angle = mean(
            angle_at(left_shoulder, pose.get(KeypointIndex::LeftElbow), left_wrist, threshold),
            angle_at(right_shoulder, pose.get(KeypointIndex::RightElbow), right_wrist, threshold),
        );

        let mut assessment = Assessment::new();

        let phase = if wrist_height > c.lockout_height_px && elbow_angle > c.lockout_angle {
            assessment.note(FeedbackItem::good("🎯 PERFECT! Full overhead extension", 1));
            Phase::Up
        } else if wrist_height > c.partial_height_px {
            assessment.deduct(
                FeedbackItem::warning("⚠️ PRESS HIGHER - full extension", 1),
                c.partial_press_deduction,
            );
            Phase::Down
        } else {
            assessment.note(FeedbackItem::info("💡 Press weights overhead", 1));
            Phase::Down
        };

        let wrist_width = (left_wrist.x - right_wrist.x).abs();
        let shoulder_width = (left_shoulder.x - right_shoulder.x).abs();
        if (wrist_width - shoulder_width).abs() > c.wrist_width_tolerance_px {
            assessment.deduct(
                FeedbackItem::warning("⚠️ Keep wrists shoulder-width apart", 2),
                c.wrist_width_deduction,
            );
        } else {
            assessment.note(FeedbackItem::good("✅ Perfect wrist alignment", 2));
        }

        assessment.note(FeedbackItem::info(
            format!(
                "📐 Elbow Angle: {}° | Full press: >{}°",
                elbow_angle.round(),
                c.lockout_angle
            ),
            5,
        ));

        assessment.finish(phase)
    }
}
