use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid record id: {0}")]
    InvalidRecordId(#[from] uuid::Error),

    #[error("document is empty: {file_name}")]
    EmptyDocument { file_name: String },

    #[error("unsupported document (expected a PDF): {file_name}")]
    UnsupportedDocument { file_name: String },

    #[error("document too large: {size} bytes (limit {limit})")]
    DocumentTooLarge { size: usize, limit: usize },
}

/// Failure to turn evaluator output into a valid [`Feedback`](crate::models::feedback::Feedback).
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("evaluator returned no feedback text")]
    Empty,

    #[error("feedback does not match the expected shape: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A score outside `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("score {0} is outside 0..=100")]
pub struct ScoreOutOfRange(pub i64);
