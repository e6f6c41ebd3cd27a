use cvwizard_storage::error::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("failed to read document for evaluation: {0}")]
    Document(#[from] StorageError),

    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model returned no text")]
    EmptyResponse,
}
