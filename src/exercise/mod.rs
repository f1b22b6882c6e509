//! Per-exercise form analyzers.
//!
//! Every analyzer is a pure function of one `Pose`: it gates on the
//! visibility of the exercise's critical joints, classifies the phase from a
//! primary metric, runs independent form checks that each deduct from a score
//! of 100, and returns priority-sorted feedback.

pub mod bicep_curl;
pub mod plank;
pub mod pushup;
pub mod shoulder_press;
pub mod squat;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::config::Config;
use crate::error::FormError;
use crate::feedback::{FeedbackItem, FeedbackList};
use crate::pose::{KeypointIndex, Pose};
use crate::pose::KeypointIndex::*;

pub use bicep_curl::BicepCurlAnalyzer;
pub use plank::PlankAnalyzer;
pub use pushup::PushupAnalyzer;
pub use shoulder_press::ShoulderPressAnalyzer;
pub use squat::SquatAnalyzer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Squat,
    Pushup,
    #[serde(alias = "bicepCurl")]
    BicepCurl,
    #[serde(alias = "shoulderPress")]
    ShoulderPress,
    Plank,
}

/// Position label produced by an analyzer.
///
/// Squat, push-up, curl and press use `Up`/`Down`; plank only ever holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Up,
    Down,
    Holding,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Up => "UP",
            Phase::Down => "DOWN",
            Phase::Holding => "HOLDING",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const SQUAT_JOINTS: &[KeypointIndex] = &[LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle];
const PUSHUP_JOINTS: &[KeypointIndex] = &[
    LeftShoulder, RightShoulder, LeftElbow, RightElbow, LeftWrist, RightWrist, LeftHip, RightHip,
];
const ARM_JOINTS: &[KeypointIndex] = &[LeftShoulder, RightShoulder, LeftElbow, RightElbow, LeftWrist, RightWrist];
const PLANK_JOINTS: &[KeypointIndex] = &[LeftShoulder, RightShoulder, LeftHip, RightHip];

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 5] = [
        ExerciseKind::Squat,
        ExerciseKind::Pushup,
        ExerciseKind::BicepCurl,
        ExerciseKind::ShoulderPress,
        ExerciseKind::Plank,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::Pushup => "pushup",
            ExerciseKind::BicepCurl => "bicep_curl",
            ExerciseKind::ShoulderPress => "shoulder_press",
            ExerciseKind::Plank => "plank",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ExerciseKind::Squat => "Squats",
            ExerciseKind::Pushup => "Push-ups",
            ExerciseKind::BicepCurl => "Bicep Curls",
            ExerciseKind::ShoulderPress => "Shoulder Press",
            ExerciseKind::Plank => "Plank Hold",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExerciseKind::Squat => "Lower body strength",
            ExerciseKind::Pushup => "Upper body & core",
            ExerciseKind::BicepCurl => "Arm strength",
            ExerciseKind::ShoulderPress => "Shoulder & triceps",
            ExerciseKind::Plank => "Core stability",
        }
    }

    /// Joints that must be visible before the analyzer says anything about form
    pub fn critical_joints(self) -> &'static [KeypointIndex] {
        match self {
            ExerciseKind::Squat => SQUAT_JOINTS,
            ExerciseKind::Pushup => PUSHUP_JOINTS,
            ExerciseKind::BicepCurl | ExerciseKind::ShoulderPress => ARM_JOINTS,
            ExerciseKind::Plank => PLANK_JOINTS,
        }
    }

    /// Phase reported while the user is not in position, and the tracker's
    /// starting phase after a reset
    pub fn rest_phase(self) -> Phase {
        match self {
            ExerciseKind::Squat | ExerciseKind::Pushup => Phase::Up,
            ExerciseKind::BicepCurl | ExerciseKind::ShoulderPress => Phase::Down,
            ExerciseKind::Plank => Phase::Holding,
        }
    }

    /// `(from, to)` phase change that completes one repetition
    pub fn counting_transition(self) -> Option<(Phase, Phase)> {
        match self {
            ExerciseKind::Squat | ExerciseKind::Pushup => Some((Phase::Down, Phase::Up)),
            ExerciseKind::BicepCurl | ExerciseKind::ShoulderPress => Some((Phase::Up, Phase::Down)),
            ExerciseKind::Plank => None,
        }
    }

    pub fn counts_reps(self) -> bool {
        self.counting_transition().is_some()
    }

    pub fn tips(self) -> &'static [&'static str] {
        match self {
            ExerciseKind::Squat => &[
                "🎯 Lower until hips at or below knee level",
                "👣 Push knees out, track over toes",
                "💪 Keep chest up, back straight",
                "⚖️ Weight evenly through full foot",
                "📐 Aim for 90° knee bend or deeper",
            ],
            ExerciseKind::Pushup => &[
                "📏 Body in straight line - no sagging",
                "💪 Lower until chest nearly touches ground",
                "🔄 Elbows at 45° angle to body",
                "🎯 Engage core throughout",
                "👀 Look slightly forward, not down",
            ],
            ExerciseKind::BicepCurl => &[
                "📌 Keep elbows locked at your sides",
                "🔝 Curl all the way to shoulders",
                "⚡ Control movement - no swinging",
                "📐 Full extension at bottom",
                "💪 Squeeze biceps at top",
            ],
            ExerciseKind::ShoulderPress => &[
                "🔝 Press directly overhead",
                "💪 Keep core tight and stable",
                "📏 Wrists shoulder-width apart",
                "🎯 Full arm extension at top",
                "⬇️ Lower to shoulder level",
            ],
            ExerciseKind::Plank => &[
                "📏 Body straight - shoulders to ankles",
                "🎯 Shoulders directly over elbows",
                "💪 Engage core and squeeze glutes",
                "😮‍💨 Breathe steadily - don't hold breath",
                "👀 Look down to keep neck neutral",
            ],
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExerciseKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "squat" => Ok(ExerciseKind::Squat),
            "pushup" | "push_up" => Ok(ExerciseKind::Pushup),
            "bicep_curl" | "bicepCurl" => Ok(ExerciseKind::BicepCurl),
            "shoulder_press" | "shoulderPress" => Ok(ExerciseKind::ShoulderPress),
            "plank" => Ok(ExerciseKind::Plank),
            other => Err(FormError::UnknownExercise(other.to_string())),
        }
    }
}

/// Output of one analyzer call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub phase: Phase,
    /// Always within `[0, 100]`
    pub score: u8,
    pub feedback: FeedbackList,
    pub in_position: bool,
}

/// Shared capability of the five analyzers
pub trait ExerciseAnalyzer {
    fn kind(&self) -> ExerciseKind;

    fn analyze(&self, pose: &Pose) -> AnalysisResult;
}

/// Closed dispatch over the five exercises
#[derive(Debug, Clone)]
pub enum Analyzer {
    Squat(SquatAnalyzer),
    Pushup(PushupAnalyzer),
    BicepCurl(BicepCurlAnalyzer),
    ShoulderPress(ShoulderPressAnalyzer),
    Plank(PlankAnalyzer),
}

impl Analyzer {
    pub fn new(kind: ExerciseKind, config: &Config) -> Self {
        match kind {
            ExerciseKind::Squat => Analyzer::Squat(SquatAnalyzer::from_config(config)),
            ExerciseKind::Pushup => Analyzer::Pushup(PushupAnalyzer::from_config(config)),
            ExerciseKind::BicepCurl => Analyzer::BicepCurl(BicepCurlAnalyzer::from_config(config)),
            ExerciseKind::ShoulderPress => {
                Analyzer::ShoulderPress(ShoulderPressAnalyzer::from_config(config))
            }
            ExerciseKind::Plank => Analyzer::Plank(PlankAnalyzer::from_config(config)),
        }
    }
}

impl ExerciseAnalyzer for Analyzer {
    fn kind(&self) -> ExerciseKind {
        match self {
            Analyzer::Squat(a) => a.kind(),
            Analyzer::Pushup(a) => a.kind(),
            Analyzer::BicepCurl(a) => a.kind(),
            Analyzer::ShoulderPress(a) => a.kind(),
            Analyzer::Plank(a) => a.kind(),
        }
    }

    fn analyze(&self, pose: &Pose) -> AnalysisResult {
        match self {
            Analyzer::Squat(a) => a.analyze(pose),
            Analyzer::Pushup(a) => a.analyze(pose),
            Analyzer::BicepCurl(a) => a.analyze(pose),
            Analyzer::ShoulderPress(a) => a.analyze(pose),
            Analyzer::Plank(a) => a.analyze(pose),
        }
    }
}

/// Short-circuit result when a critical joint is not visible: one warning,
/// zero score, rest phase.
pub(crate) fn visibility_gate(
    kind: ExerciseKind,
    pose: &Pose,
    confidence_threshold: f32,
    message: &str,
) -> Option<AnalysisResult> {
    let missing = pose.first_hidden(kind.critical_joints(), confidence_threshold)?;
    debug!(exercise = %kind, joint = missing.name(), "critical joint not visible");
    Some(AnalysisResult {
        phase: kind.rest_phase(),
        score: 0,
        feedback: FeedbackList::single(FeedbackItem::warning(message, 1)),
        in_position: false,
    })
}

/// Running score and feedback for one in-position frame
pub(crate) struct Assessment {
    score: i32,
    feedback: FeedbackList,
}

impl Assessment {
    pub(crate) fn new() -> Self {
        Self {
            score: 100,
            feedback: FeedbackList::new(),
        }
    }

    /// Feedback that costs nothing
    pub(crate) fn note(&mut self, item: FeedbackItem) {
        self.feedback.push(item);
    }

    pub(crate) fn deduct(&mut self, item: FeedbackItem, points: i32) {
        self.score -= points;
        self.feedback.push(item);
    }

    pub(crate) fn finish(self, phase: Phase) -> AnalysisResult {
        AnalysisResult {
            phase,
            score: self.score.clamp(0, 100) as u8,
            feedback: self.feedback.finish(),
            in_position: true,
        }
    }
}
