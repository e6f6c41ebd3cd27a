use std::sync::Arc;
use std::time::Duration;

use cvwizard_bedrock::BedrockEvaluator;
use cvwizard_pipeline::preview::PdftoppmRenderer;
use cvwizard_pipeline::{Catalog, Pipeline, PipelineContext};
use cvwizard_storage::local::{LocalBlobStore, LocalKvStore};
use cvwizard_storage::s3::{S3BlobStore, S3KvStore};
use cvwizard_storage::{BlobStore, KvStore, client};

use crate::config::{Backend, CliConfig};

/// Everything a command needs, built once from the config.
pub struct Runtime {
    pub pipeline: Pipeline,
    pub catalog: Catalog,
    pub locator_ttl: Duration,
}

impl Runtime {
    pub async fn build(config: &CliConfig) -> eyre::Result<Self> {
        let sdk_config = client::load_sdk_config(&config.region, config.profile.as_deref()).await;

        let (blobs, kv): (Arc<dyn BlobStore>, Arc<dyn KvStore>) = match &config.backend {
            Backend::S3 { bucket } => {
                let s3 = aws_sdk_s3::Client::new(&sdk_config);
                tracing::info!(bucket = %bucket, region = %config.region, "using S3 backend");
                (
                    Arc::new(S3BlobStore::new(s3.clone(), bucket.clone())),
                    Arc::new(S3KvStore::new(s3, bucket.clone())),
                )
            }
            Backend::Local { root } => {
                tracing::info!(root = %root.display(), "using local backend");
                (
                    Arc::new(LocalBlobStore::new(root.join("blobs")).await?),
                    Arc::new(LocalKvStore::new(root.join("kv")).await?),
                )
            }
        };

        let evaluator = Arc::new(BedrockEvaluator::new(
            &sdk_config,
            config.model_id.clone(),
            blobs.clone(),
        ));
        let renderer = Arc::new(PdftoppmRenderer::new("pdftoppm", config.preview_dpi));

        let ctx = PipelineContext::new(blobs, kv, evaluator, renderer);
        Ok(Self {
            catalog: Catalog::from_context(&ctx),
            pipeline: Pipeline::new(ctx),
            locator_ttl: Duration::from_secs(config.locator_ttl_secs),
        })
    }
}
