//! One live workout: the selected exercise's analyzer, its tracker state and
//! the per-frame report handed to whatever renders the results.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::exercise::{Analyzer, ExerciseAnalyzer, ExerciseKind, Phase};
use crate::feedback::{
    status_line, FeedbackItem, FeedbackList, ScoreGrade, NO_PERSON_MESSAGE, NO_PERSON_STATUS,
};
use crate::pose::{Keypoint, Pose};
use crate::tracker::{RepTracker, TrackerState};

/// Everything a display layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub exercise: ExerciseKind,
    pub phase: Phase,
    pub score: u8,
    pub grade: ScoreGrade,
    pub rep_count: u32,
    pub rep_completed: bool,
    pub feedback: FeedbackList,
    pub in_position: bool,
    pub status: String,
    pub visible_keypoints: usize,
    pub average_confidence: f32,
}

pub struct WorkoutSession {
    config: Config,
    analyzer: Analyzer,
    tracker: RepTracker,
    state: TrackerState,
}

impl WorkoutSession {
    pub fn new(kind: ExerciseKind, config: Config) -> Self {
        let analyzer = Analyzer::new(kind, &config);
        let tracker = RepTracker::new(kind, config.engine.debounce());
        info!(exercise = %kind, "session started");
        Self {
            config,
            analyzer,
            tracker,
            state: TrackerState::new(kind),
        }
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.analyzer.kind()
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn rep_count(&self) -> u32 {
        self.state.rep_count
    }

    /// Switch exercise. Always resets the counters, even for the same kind.
    pub fn set_exercise(&mut self, kind: ExerciseKind) {
        self.analyzer = Analyzer::new(kind, &self.config);
        self.tracker = RepTracker::new(kind, self.config.engine.debounce());
        self.tracker.reset(&mut self.state);
    }

    pub fn reset_stats(&mut self) {
        self.tracker.reset(&mut self.state);
    }

    /// Analyze one frame. `None` means the pose source saw nobody.
    pub fn process(&mut self, pose: Option<&Pose>, timestamp: Duration) -> FrameReport {
        let kind = self.exercise();
        let Some(pose) = pose else {
            debug!("no person in frame");
            return FrameReport {
                exercise: kind,
                phase: self.state.last_phase,
                score: 0,
                grade: ScoreGrade::from_score(0),
                rep_count: self.state.rep_count,
                rep_completed: false,
                feedback: FeedbackList::single(FeedbackItem::warning(NO_PERSON_MESSAGE, 1)),
                in_position: false,
                status: NO_PERSON_STATUS.to_string(),
                visible_keypoints: 0,
                average_confidence: 0.0,
            };
        };

        let mut result = self.analyzer.analyze(pose);

        // Out-of-position frames never touch the tracker
        let rep_completed = result.in_position
            && self
                .tracker
                .observe(&mut self.state, result.phase, result.score, timestamp)
                .is_counted();
        if rep_completed {
            result.feedback.announce_rep();
        }

        let visible = pose.visible_count(self.config.engine.confidence_threshold);
        FrameReport {
            exercise: kind,
            phase: result.phase,
            score: result.score,
            grade: ScoreGrade::from_score(result.score),
            rep_count: self.state.rep_count,
            rep_completed,
            feedback: result.feedback,
            in_position: result.in_position,
            status: status_line(visible),
            visible_keypoints: visible,
            average_confidence: pose.average_confidence(),
        }
    }

    /// Like [`process`](Self::process) but takes the raw keypoint sequence
    /// from the pose source. Anything other than 17 entries is rejected.
    pub fn process_keypoints(
        &mut self,
        keypoints: Option<&[Keypoint]>,
        timestamp: Duration,
    ) -> Result<FrameReport> {
        let pose = keypoints.map(Pose::try_from_slice).transpose()?;
        Ok(self.process(pose.as_ref(), timestamp))
    }
}
