//! The submission workflow.
//!
//! A submission runs seven stages strictly in order, each consuming the
//! previous one's output:
//!
//! 1. store the document
//! 2. derive a first-page preview
//! 3. store the preview
//! 4. checkpoint a provisional record (no feedback)
//! 5. evaluate the stored document
//! 6. parse the evaluator output as [`Feedback`]
//! 7. finalize: overwrite the record with feedback attached
//!
//! The first failure stops the submission. Nothing is retried and nothing
//! already stored is rolled back: a failure after stage 4 leaves the
//! provisional record in place, visible to listings.

use cvwizard_bedrock::EvaluationError;
use cvwizard_bedrock::instructions::prepare_instructions;
use cvwizard_core::keys;
use cvwizard_core::models::document::Document;
use cvwizard_core::models::feedback::Feedback;
use cvwizard_core::models::job::JobContext;
use cvwizard_core::models::record::{BlobPath, Record, RecordId};
use cvwizard_storage::BlobUpload;
use cvwizard_storage::error::StorageError;
use cvwizard_storage::state::save_json;
use tracing::{Instrument, error, info, info_span};

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::preview::PreviewImage;
use crate::status::{Stage, Status};

pub struct Pipeline {
    ctx: PipelineContext,
}

impl Pipeline {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    /// Run a submission to completion.
    ///
    /// `on_status` is called before each stage starts and once more with a
    /// terminal [`Status::Complete`] or [`Status::Failed`].
    pub async fn submit<F>(
        &self,
        document: Document,
        job: JobContext,
        mut on_status: F,
    ) -> Result<RecordId, PipelineError>
    where
        F: FnMut(&Status) + Send,
    {
        let id = RecordId::generate();
        let span = info_span!("submit", record_id = %id, file_name = %document.file_name);

        let result = self
            .run(id, document, job, &mut on_status)
            .instrument(span)
            .await;

        match &result {
            Ok(record_id) => {
                info!(record_id = %record_id, "submission complete");
                on_status(&Status::Complete(*record_id));
            }
            Err(e) => {
                error!(record_id = %id, stage = %e.stage(), error = %e, "submission failed");
                on_status(&Status::Failed(e.stage()));
            }
        }
        result
    }

    async fn run<F>(
        &self,
        id: RecordId,
        document: Document,
        job: JobContext,
        on_status: &mut F,
    ) -> Result<RecordId, PipelineError>
    where
        F: FnMut(&Status) + Send,
    {
        on_status(&Status::UploadingFile);
        document
            .validate()
            .map_err(PipelineError::InvalidDocument)?;
        let document_path = self
            .store_document(&document)
            .instrument(stage_span(Stage::StoreDocument))
            .await?;

        on_status(&Status::ConvertingToImage);
        let preview = self
            .ctx
            .renderer
            .render(&document)
            .instrument(stage_span(Stage::DerivePreview))
            .await
            .map_err(PipelineError::DerivePreview)?;

        on_status(&Status::UploadingImage);
        let preview_path = self
            .store_preview(preview)
            .instrument(stage_span(Stage::StorePreview))
            .await?;

        on_status(&Status::PreparingData);
        let record = Record::provisional(id, document_path, preview_path, job);
        self.save(&record)
            .instrument(stage_span(Stage::Checkpoint))
            .await
            .map_err(|source| PipelineError::Checkpoint {
                record_id: id,
                source,
            })?;
        info!("provisional record written");

        on_status(&Status::Analyzing);
        let text = self
            .evaluate(&record)
            .instrument(stage_span(Stage::Evaluate))
            .await
            .map_err(|source| PipelineError::Evaluate {
                record_id: id,
                source,
            })?;

        let feedback = stage_span(Stage::ParseFeedback)
            .in_scope(|| Feedback::parse(&text))
            .map_err(|source| PipelineError::ParseFeedback {
                record_id: id,
                source,
            })?;

        self.finalize(record, feedback)
            .instrument(stage_span(Stage::Finalize))
            .await?;
        Ok(id)
    }

    async fn store_document(&self, document: &Document) -> Result<BlobPath, PipelineError> {
        let path = self
            .ctx
            .blobs
            .upload(BlobUpload {
                file_name: document.file_name.clone(),
                content_type: document.content_type.clone(),
                bytes: document.bytes.clone(),
            })
            .await
            .map_err(PipelineError::StoreDocument)?;
        info!(path = %path, bytes = document.bytes.len(), "document stored");
        Ok(path)
    }

    async fn store_preview(&self, preview: PreviewImage) -> Result<BlobPath, PipelineError> {
        let bytes = preview.bytes.len();
        let path = self
            .ctx
            .blobs
            .upload(BlobUpload {
                file_name: preview.file_name,
                content_type: preview.content_type,
                bytes: preview.bytes,
            })
            .await
            .map_err(PipelineError::StorePreview)?;
        info!(path = %path, bytes, "preview stored");
        Ok(path)
    }

    /// Ask the evaluator about the stored document and return the reply text.
    /// A reply without text counts as no result.
    async fn evaluate(&self, record: &Record) -> Result<String, EvaluationError> {
        let instructions = prepare_instructions(&record.job());
        let response = self
            .ctx
            .evaluator
            .evaluate(&record.document_path, &instructions)
            .await?;
        let text = response.text().ok_or(EvaluationError::EmptyResponse)?;
        info!(chars = text.len(), "evaluation received");
        Ok(text.to_string())
    }

    /// Attach feedback to a record and overwrite its stored form.
    ///
    /// Writes to the same key as the checkpoint, so applying the same
    /// feedback again leaves exactly one identical record.
    pub async fn finalize(
        &self,
        record: Record,
        feedback: Feedback,
    ) -> Result<Record, PipelineError> {
        let record = record.with_feedback(feedback);
        self.save(&record)
            .await
            .map_err(|source| PipelineError::Finalize {
                record_id: record.id,
                source,
            })?;
        info!(record_id = %record.id, "record finalized");
        Ok(record)
    }

    async fn save(&self, record: &Record) -> Result<(), StorageError> {
        save_json(self.ctx.kv.as_ref(), &keys::record(record.id), record).await
    }
}

fn stage_span(stage: Stage) -> tracing::Span {
    info_span!("stage", stage = stage.as_str())
}
