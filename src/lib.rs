//! Real-time exercise form analysis from 2-D pose keypoints.
//!
//! A [`session::WorkoutSession`] takes one frame of 17 MoveNet keypoints at a
//! time, runs the selected exercise's analyzer, feeds the resulting phase to a
//! debounced rep tracker and returns a [`session::FrameReport`].

pub mod config;
pub mod error;
pub mod exercise;
pub mod feedback;
pub mod geometry;
pub mod pose;
pub mod session;
pub mod tracker;

pub use config::Config;
pub use error::{FormError, Result};
pub use exercise::{AnalysisResult, Analyzer, ExerciseAnalyzer, ExerciseKind, Phase};
pub use feedback::{FeedbackItem, FeedbackList, Severity};
pub use pose::{Keypoint, KeypointIndex, Pose};
pub use session::{FrameReport, WorkoutSession};
pub use tracker::{RepTracker, TrackerState};
