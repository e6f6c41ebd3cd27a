#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cvwizard_bedrock::{EvaluationError, Evaluator};
use cvwizard_core::BoxFuture;
use cvwizard_core::models::document::Document;
use cvwizard_core::models::evaluation::{ContentPart, EvaluationResponse, MessageContent};
use cvwizard_core::models::record::BlobPath;
use cvwizard_pipeline::preview::{PreviewError, PreviewImage, PreviewRenderer};
use cvwizard_pipeline::{Catalog, Pipeline, PipelineContext, Status};
use cvwizard_storage::error::StorageError;
use cvwizard_storage::memory::{MemoryBlobStore, MemoryKvStore};
use cvwizard_storage::{BlobEntry, BlobLocator, BlobStore, BlobUpload};

pub const FEEDBACK_JSON: &str = r#"{
  "overallScore": 72,
  "ATS": { "score": 80, "tips": [{ "type": "good", "tip": "Clear section headings" }] },
  "toneAndStyle": { "score": 70, "tips": [{ "type": "improve", "tip": "Fewer buzzwords", "explanation": "Replace generic adjectives with outcomes." }] },
  "content": { "score": 65, "tips": [] },
  "structure": { "score": 75, "tips": [{ "type": "good", "tip": "One page", "explanation": "Fits on a single page." }] },
  "skills": { "score": 68, "tips": [] }
}"#;

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-preview";

pub fn pdf(name: &str) -> Document {
    Document::pdf(name, b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF".to_vec())
}

/// What the scripted evaluator answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Parts(Vec<String>),
    Fail,
}

pub struct ScriptedEvaluator {
    reply: Reply,
    calls: Mutex<Vec<(BlobPath, String)>>,
}

impl ScriptedEvaluator {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(BlobPath, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Evaluator for ScriptedEvaluator {
    fn evaluate<'a>(
        &'a self,
        document: &'a BlobPath,
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<EvaluationResponse, EvaluationError>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((document.clone(), instructions.to_string()));
            let content = match &self.reply {
                Reply::Text(text) => MessageContent::Text(text.clone()),
                Reply::Parts(parts) => MessageContent::Parts(
                    parts
                        .iter()
                        .map(|text| ContentPart { text: text.clone() })
                        .collect(),
                ),
                Reply::Fail => {
                    return Err(EvaluationError::Invocation("service unavailable".into()));
                }
            };
            Ok(EvaluationResponse {
                content,
                usage: None,
            })
        })
    }
}

pub struct FakeRenderer {
    pub fail: bool,
}

impl PreviewRenderer for FakeRenderer {
    fn render<'a>(
        &'a self,
        document: &'a Document,
    ) -> BoxFuture<'a, Result<PreviewImage, PreviewError>> {
        Box::pin(async move {
            if self.fail {
                return Err(PreviewError::NoImage);
            }
            Ok(PreviewImage::png_for(document, PNG_BYTES.to_vec()))
        })
    }
}

/// Memory blob store whose n-th upload (0-based) fails.
pub struct FlakyBlobStore {
    pub inner: MemoryBlobStore,
    fail_upload_at: Option<usize>,
    uploads: AtomicUsize,
}

impl FlakyBlobStore {
    pub fn new(fail_upload_at: Option<usize>) -> Self {
        Self {
            inner: MemoryBlobStore::new(),
            fail_upload_at,
            uploads: AtomicUsize::new(0),
        }
    }
}

impl BlobStore for FlakyBlobStore {
    fn upload(&self, upload: BlobUpload) -> BoxFuture<'_, Result<BlobPath, StorageError>> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        if Some(n) == self.fail_upload_at {
            return Box::pin(async { Err(StorageError::PutObject("bucket unreachable".into())) });
        }
        self.inner.upload(upload)
    }

    fn read<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<Vec<u8>, StorageError>> {
        self.inner.read(path)
    }

    fn exists<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<bool, StorageError>> {
        self.inner.exists(path)
    }

    fn delete<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<(), StorageError>> {
        self.inner.delete(path)
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<BlobEntry>, StorageError>> {
        self.inner.list(prefix)
    }

    fn locate<'a>(
        &'a self,
        path: &'a BlobPath,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<BlobLocator, StorageError>> {
        self.inner.locate(path, ttl)
    }
}

pub struct Harness {
    pub blobs: Arc<FlakyBlobStore>,
    pub kv: Arc<MemoryKvStore>,
    pub evaluator: Arc<ScriptedEvaluator>,
    pub pipeline: Pipeline,
    pub catalog: Catalog,
}

pub fn harness(reply: Reply) -> Harness {
    harness_with(reply, false, None)
}

pub fn harness_with(reply: Reply, renderer_fails: bool, fail_upload_at: Option<usize>) -> Harness {
    let blobs = Arc::new(FlakyBlobStore::new(fail_upload_at));
    let kv = Arc::new(MemoryKvStore::new());
    let evaluator = Arc::new(ScriptedEvaluator::new(reply));
    let ctx = PipelineContext::new(
        blobs.clone(),
        kv.clone(),
        evaluator.clone(),
        Arc::new(FakeRenderer {
            fail: renderer_fails,
        }),
    );
    Harness {
        blobs,
        kv,
        evaluator,
        catalog: Catalog::from_context(&ctx),
        pipeline: Pipeline::new(ctx),
    }
}

/// Collects every status the pipeline reports.
pub fn recorder() -> (Arc<Mutex<Vec<Status>>>, impl FnMut(&Status) + Send) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |status: &Status| {
        sink.lock().unwrap().push(status.clone())
    })
}

pub const TTL: Duration = Duration::from_secs(600);
