use std::sync::Arc;

use cvwizard_bedrock::Evaluator;
use cvwizard_storage::{BlobStore, KvStore};

use crate::preview::PreviewRenderer;

/// The collaborators a pipeline runs against. Built once by the caller and
/// handed to [`Pipeline::new`](crate::Pipeline::new); nothing is looked up
/// from global state.
#[derive(Clone)]
pub struct PipelineContext {
    pub blobs: Arc<dyn BlobStore>,
    pub kv: Arc<dyn KvStore>,
    pub evaluator: Arc<dyn Evaluator>,
    pub renderer: Arc<dyn PreviewRenderer>,
}

impl PipelineContext {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        kv: Arc<dyn KvStore>,
        evaluator: Arc<dyn Evaluator>,
        renderer: Arc<dyn PreviewRenderer>,
    ) -> Self {
        Self {
            blobs,
            kv,
            evaluator,
            renderer,
        }
    }
}
