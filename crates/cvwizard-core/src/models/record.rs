use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::feedback::{Feedback, Score};
use super::job::JobContext;
use crate::error::CoreError;

/// Opaque record identifier, generated once per submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Handle to a stored blob, as returned by the blob store on upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct BlobPath(String);

impl BlobPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The persisted envelope: one uploaded document, its preview, the job it
/// was evaluated against, and (once evaluation finishes) its feedback.
///
/// A record is written twice under the same key: first provisionally with
/// `feedback: null`, then in final form. The identifier and both blob paths
/// never change after the first write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Record {
    pub id: RecordId,
    #[serde(rename = "resumePath")]
    pub document_path: BlobPath,
    #[serde(rename = "imagePath")]
    pub preview_path: BlobPath,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_feedback")]
    feedback: Option<Feedback>,
}

impl Record {
    /// Build the checkpoint form of a record (no feedback yet).
    pub fn provisional(
        id: RecordId,
        document_path: BlobPath,
        preview_path: BlobPath,
        job: JobContext,
    ) -> Self {
        Self {
            id,
            document_path,
            preview_path,
            company_name: job.company_name,
            job_title: job.job_title,
            job_description: job.job_description,
            feedback: None,
        }
    }

    /// Attach feedback, producing the final form. Everything else is carried
    /// over untouched.
    pub fn with_feedback(self, feedback: Feedback) -> Self {
        Self {
            feedback: Some(feedback),
            ..self
        }
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.feedback.is_some()
    }

    pub fn job(&self) -> JobContext {
        JobContext {
            company_name: self.company_name.clone(),
            job_title: self.job_title.clone(),
            job_description: self.job_description.clone(),
        }
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            company_name: self.company_name.clone(),
            job_title: self.job_title.clone(),
            preview_path: self.preview_path.clone(),
            overall_score: self.feedback.as_ref().map(|f| f.overall_score),
        }
    }
}

/// Card-sized projection of a record for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecordSummary {
    pub id: RecordId,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub preview_path: BlobPath,
    pub overall_score: Option<Score>,
}

/// `null`, a missing field and `""` all mean "not evaluated yet". Older
/// records were checkpointed with an empty string.
fn deserialize_feedback<'de, D>(deserializer: D) -> Result<Option<Feedback>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Final(Feedback),
        Text(String),
    }

    match Option::<Stored>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Stored::Final(feedback)) => Ok(Some(feedback)),
        Some(Stored::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Stored::Text(_)) => Err(D::Error::custom(
            "feedback must be an object, null, or an empty string",
        )),
    }
}
