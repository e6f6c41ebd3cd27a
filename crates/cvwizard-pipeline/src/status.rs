//! Progress reported to the submitter while a document moves through the
//! pipeline. The display text of every status is user-facing.

use std::fmt;

use cvwizard_core::models::record::RecordId;

/// One step of a submission, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    StoreDocument,
    DerivePreview,
    StorePreview,
    Checkpoint,
    Evaluate,
    ParseFeedback,
    Finalize,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::StoreDocument,
        Stage::DerivePreview,
        Stage::StorePreview,
        Stage::Checkpoint,
        Stage::Evaluate,
        Stage::ParseFeedback,
        Stage::Finalize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StoreDocument => "store_document",
            Self::DerivePreview => "derive_preview",
            Self::StorePreview => "store_preview",
            Self::Checkpoint => "checkpoint",
            Self::Evaluate => "evaluate",
            Self::ParseFeedback => "parse_feedback",
            Self::Finalize => "finalize",
        }
    }

    /// Status text shown when this stage fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::StoreDocument => "Error: Failed to upload file",
            Self::DerivePreview => "Error: Failed to convert PDF to image",
            Self::StorePreview => "Error: Failed to upload image",
            Self::Checkpoint | Self::Finalize => "Error: Failed to save record",
            Self::Evaluate => "Error: Failed to analyze resume",
            Self::ParseFeedback => "Error: Failed to parse analysis",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    UploadingFile,
    ConvertingToImage,
    UploadingImage,
    PreparingData,
    Analyzing,
    Complete(RecordId),
    Failed(Stage),
}

impl Status {
    pub fn message(&self) -> &'static str {
        match self {
            Self::UploadingFile => "Uploading the file...",
            Self::ConvertingToImage => "Converting to image...",
            Self::UploadingImage => "Uploading the image...",
            Self::PreparingData => "Preparing data...",
            Self::Analyzing => "Analyzing...",
            Self::Complete(_) => "Analysis complete, redirecting...",
            Self::Failed(stage) => stage.failure_message(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
