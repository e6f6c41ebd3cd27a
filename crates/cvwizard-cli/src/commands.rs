use std::io::Write;
use std::path::Path;

use cvwizard_core::models::document::Document;
use cvwizard_core::models::job::JobContext;
use cvwizard_core::models::record::{Record, RecordId};
use cvwizard_pipeline::Status;
use cvwizard_pipeline::wipe::{self, WipeSummary};
use cvwizard_storage::BlobLocator;
use eyre::WrapErr;
use serde::Serialize;

use crate::runtime::Runtime;

pub async fn submit(
    runtime: &Runtime,
    path: &Path,
    job: JobContext,
    out: &mut (dyn Write + Send),
) -> eyre::Result<RecordId> {
    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    let result = runtime
        .pipeline
        .submit(Document::pdf(file_name, bytes), job, |status: &Status| {
            let _ = writeln!(out, "{status}");
        })
        .await;

    match result {
        Ok(id) => {
            writeln!(out, "{id}")?;
            Ok(id)
        }
        Err(e) => {
            if let Some(id) = e.record_id() {
                writeln!(out, "record {id} was kept without feedback")?;
            }
            Err(e).wrap_err("submission failed")
        }
    }
}

/// One line per record: id, score (or `pending`), company, job title.
pub async fn list(
    runtime: &Runtime,
    completed_only: bool,
    out: &mut dyn Write,
) -> eyre::Result<usize> {
    let records = if completed_only {
        runtime.catalog.list_completed().await?
    } else {
        runtime.catalog.list_all().await?
    };

    for record in &records {
        writeln!(out, "{}", summary_line(record))?;
    }
    Ok(records.len())
}

pub fn summary_line(record: &Record) -> String {
    let summary = record.summary();
    let score = summary
        .overall_score
        .map_or_else(|| "pending".to_string(), |s| s.to_string());
    format!(
        "{}  {:>7}  {}  {}",
        summary.id,
        score,
        summary.company_name.as_deref().unwrap_or("-"),
        summary.job_title.as_deref().unwrap_or("-"),
    )
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    record: &'a Record,
    document: &'a BlobLocator,
    preview: &'a BlobLocator,
}

pub async fn show(runtime: &Runtime, id: &str, out: &mut dyn Write) -> eyre::Result<()> {
    let id: RecordId = id.parse().wrap_err_with(|| format!("invalid record id {id:?}"))?;
    let loaded = runtime
        .catalog
        .load_one(id, runtime.locator_ttl)
        .await?
        .ok_or_else(|| eyre::eyre!("record {id} not found"))?;

    let json = serde_json::to_string_pretty(&ShowOutput {
        record: &loaded.record,
        document: &loaded.document,
        preview: &loaded.preview,
    })?;
    writeln!(out, "{json}")?;
    Ok(())
}

pub async fn wipe(runtime: &Runtime, confirmed: bool) -> eyre::Result<WipeSummary> {
    if !confirmed {
        eyre::bail!("refusing to wipe without --yes");
    }
    let ctx = runtime.pipeline.context();
    Ok(wipe::wipe_all(ctx.blobs.as_ref(), ctx.kv.as_ref()).await?)
}
