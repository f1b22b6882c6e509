use std::path::PathBuf;

use thiserror::Error;

/// Errors the engine reports to its caller.
///
/// Poor tracking quality is not an error; these cover contract violations by
/// the collaborators feeding the engine and configuration failures.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("expected {expected} keypoints per frame, got {actual}")]
    KeypointCount { expected: usize, actual: usize },

    #[error("unknown exercise '{0}' (expected one of: squat, pushup, bicep_curl, shoulder_press, plank)")]
    UnknownExercise(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FormError>;
