use cvwizard_bedrock::EvaluationError;
use cvwizard_core::error::{CoreError, FeedbackError};
use cvwizard_core::models::record::RecordId;
use cvwizard_storage::error::StorageError;
use thiserror::Error;

use crate::preview::PreviewError;
use crate::status::Stage;

/// A failed submission, tagged with the stage that failed.
///
/// Variants from the checkpoint onwards carry the record id. After a failed
/// evaluation or parse the provisional record stays in the store.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("document rejected: {0}")]
    InvalidDocument(#[source] CoreError),

    #[error("failed to store document: {0}")]
    StoreDocument(#[source] StorageError),

    #[error("failed to derive preview: {0}")]
    DerivePreview(#[source] PreviewError),

    #[error("failed to store preview: {0}")]
    StorePreview(#[source] StorageError),

    #[error("failed to checkpoint record {record_id}: {source}")]
    Checkpoint {
        record_id: RecordId,
        source: StorageError,
    },

    #[error("evaluation failed for record {record_id}: {source}")]
    Evaluate {
        record_id: RecordId,
        source: EvaluationError,
    },

    #[error("evaluation output for record {record_id} is not valid feedback: {source}")]
    ParseFeedback {
        record_id: RecordId,
        source: FeedbackError,
    },

    #[error("failed to finalize record {record_id}: {source}")]
    Finalize {
        record_id: RecordId,
        source: StorageError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidDocument(_) | Self::StoreDocument(_) => Stage::StoreDocument,
            Self::DerivePreview(_) => Stage::DerivePreview,
            Self::StorePreview(_) => Stage::StorePreview,
            Self::Checkpoint { .. } => Stage::Checkpoint,
            Self::Evaluate { .. } => Stage::Evaluate,
            Self::ParseFeedback { .. } => Stage::ParseFeedback,
            Self::Finalize { .. } => Stage::Finalize,
        }
    }

    /// The record id, once the submission reached the checkpoint stage.
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::InvalidDocument(_)
            | Self::StoreDocument(_)
            | Self::DerivePreview(_)
            | Self::StorePreview(_) => None,
            Self::Checkpoint { record_id, .. }
            | Self::Evaluate { record_id, .. }
            | Self::ParseFeedback { record_id, .. }
            | Self::Finalize { record_id, .. } => Some(*record_id),
        }
    }
}
