//! Document evaluation via the Bedrock Converse API.
//!
//! The stored PDF is sent as a `DocumentBlock` next to the instruction text;
//! the Converse API parses the document natively.

use std::sync::Arc;

use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, DocumentBlock, DocumentFormat, DocumentSource, Message,
};
use cvwizard_core::BoxFuture;
use cvwizard_core::models::evaluation::{ContentPart, EvaluationResponse, MessageContent};
use cvwizard_core::models::record::BlobPath;
use cvwizard_storage::BlobStore;
use tracing::{info, warn};

use crate::error::EvaluationError;
use crate::tokens;

/// The evaluation service: given a stored document and instructions, reply
/// with the model's message.
pub trait Evaluator: Send + Sync {
    fn evaluate<'a>(
        &'a self,
        document: &'a BlobPath,
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<EvaluationResponse, EvaluationError>>;
}

pub struct BedrockEvaluator {
    client: aws_sdk_bedrockruntime::Client,
    model_id: String,
    blobs: Arc<dyn BlobStore>,
}

impl BedrockEvaluator {
    pub fn new(
        config: &aws_config::SdkConfig,
        model_id: impl Into<String>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            client: aws_sdk_bedrockruntime::Client::new(config),
            model_id: model_id.into(),
            blobs,
        }
    }

    async fn converse(
        &self,
        document: &BlobPath,
        instructions: &str,
    ) -> Result<EvaluationResponse, EvaluationError> {
        let bytes = self.blobs.read(document).await?;
        let doc_name = document_name(document);

        let doc_block = DocumentBlock::builder()
            .format(DocumentFormat::Pdf)
            .name(doc_name)
            .source(DocumentSource::Bytes(aws_smithy_types::Blob::new(bytes)))
            .build()
            .map_err(|e| EvaluationError::Invocation(e.to_string()))?;

        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Document(doc_block))
            .content(ContentBlock::Text(instructions.to_string()))
            .build()
            .map_err(|e| EvaluationError::Invocation(e.to_string()))?;

        info!(model_id = %self.model_id, document = %document, "evaluating document");

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .send()
            .await
            .map_err(|e| EvaluationError::Invocation(e.into_service_error().to_string()))?;

        let usage = response
            .usage()
            .map(|u| tokens::usage_for(&self.model_id, u));

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or(EvaluationError::EmptyResponse)?;

        let parts: Vec<ContentPart> = output_message
            .content()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(t) => Some(ContentPart { text: t.clone() }),
                _ => None,
            })
            .collect();

        if parts.is_empty() {
            warn!(model_id = %self.model_id, "model reply carried no text blocks");
            return Err(EvaluationError::EmptyResponse);
        }

        if let Some(usage) = &usage {
            info!(
                model_id = %self.model_id,
                input_tokens = usage.tokens.input,
                output_tokens = usage.tokens.output,
                cost_usd = usage.cost_usd,
                "evaluation complete"
            );
        }

        Ok(EvaluationResponse {
            content: MessageContent::Parts(parts),
            usage,
        })
    }
}

impl Evaluator for BedrockEvaluator {
    fn evaluate<'a>(
        &'a self,
        document: &'a BlobPath,
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<EvaluationResponse, EvaluationError>> {
        Box::pin(self.converse(document, instructions))
    }
}

/// Bedrock `DocumentBlock` names only allow alphanumerics, single spaces,
/// hyphens, parentheses and square brackets.
pub fn sanitize_document_name(file_name: &str) -> String {
    let mut result = String::with_capacity(file_name.len());
    let mut prev_space = true;
    for c in file_name.chars() {
        if c.is_alphanumeric() || matches!(c, '-' | '(' | ')' | '[' | ']') {
            result.push(c);
            prev_space = false;
        } else if !prev_space {
            result.push(' ');
            prev_space = true;
        }
    }
    let trimmed = result.trim_end();
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

fn document_name(path: &BlobPath) -> String {
    let file_name = path.as_str().rsplit('/').next().unwrap_or_default();
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    sanitize_document_name(stem)
}
