//! Error types.
//!
//! None of these reach the host through the bridge: store faults are logged
//! and absorbed. They exist at the port and configuration boundaries.

use std::path::PathBuf;

/// Failure reported by a `ResultBackend`.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in table '{table}': {source}")]
    Codec {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("table '{0}' is not open")]
    NotOpen(String),

    #[error("{0}")]
    Other(String),
}

/// Failure of an analytics sink. Always ignored by the bridge.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("analytics delivery failed: {0}")]
    Delivery(String),
}

/// Invalid answer sheet passed to `Quiz::grade`.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("expected {expected} answers, got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },

    #[error("question {question} has no answer at index {choice}")]
    AnswerOutOfRange { question: usize, choice: usize },
}
