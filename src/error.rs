//! Error types with fix suggestions

use std::path::PathBuf;

use thiserror::Error;

use crate::message::TaskType;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stats file for '{task}' could not be ingested: {path:?}")]
    Stats {
        task: TaskType,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid task match pattern: {0}")]
    BadPattern(#[from] regex::Error),
}

impl FixSuggestion for RelayError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            RelayError::Io(_) => Some("Check file path and permissions"),
            RelayError::Json(_) => Some("Ensure the payload is valid JSON"),
            RelayError::Stats { .. } => {
                Some("Run the task with --dashboard so the stats file is written")
            }
            RelayError::BadPattern(_) => Some("Check the task match regex syntax"),
        }
    }
}
