//! First-page raster previews of submitted documents.

use std::path::PathBuf;
use std::process::Stdio;

use cvwizard_core::BoxFuture;
use cvwizard_core::models::document::{Document, is_pdf};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

pub const PNG_CONTENT_TYPE: &str = "image/png";

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("not a PDF document: {file_name}")]
    NotPdf { file_name: String },

    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    #[error("{binary} exited with {status}: {stderr}")]
    Tool {
        binary: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("conversion produced no image")]
    NoImage,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An image derived from a document, ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PreviewImage {
    /// A PNG preview named after the source document (`cv.pdf` → `cv.png`).
    pub fn png_for(document: &Document, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{}.png", document.stem()),
            content_type: PNG_CONTENT_TYPE.to_string(),
            bytes,
        }
    }
}

/// Renders the first page of a document to an image.
pub trait PreviewRenderer: Send + Sync {
    fn render<'a>(
        &'a self,
        document: &'a Document,
    ) -> BoxFuture<'a, Result<PreviewImage, PreviewError>>;
}

/// Renders with poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRenderer {
    binary: PathBuf,
    dpi: u32,
}

impl PdftoppmRenderer {
    pub const DEFAULT_DPI: u32 = 150;

    pub fn new(binary: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }

    async fn convert(&self, document: &Document) -> Result<PreviewImage, PreviewError> {
        if !is_pdf(&document.bytes) {
            return Err(PreviewError::NotPdf {
                file_name: document.file_name.clone(),
            });
        }

        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("input.pdf");
        let output_prefix = workdir.path().join("page");
        tokio::fs::write(&input, &document.bytes).await?;

        let output = Command::new(&self.binary)
            .arg("-png")
            .arg("-singlefile")
            .args(["-f", "1", "-l", "1"])
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&input)
            .arg(&output_prefix)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| PreviewError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(PreviewError::Tool {
                binary: self.binary.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // -singlefile writes `<prefix>.png` with no page suffix.
        let bytes = match tokio::fs::read(output_prefix.with_extension("png")).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PreviewError::NoImage);
            }
            Err(e) => return Err(e.into()),
        };
        if !bytes.starts_with(PNG_MAGIC) {
            return Err(PreviewError::NoImage);
        }

        debug!(
            file_name = %document.file_name,
            dpi = self.dpi,
            bytes = bytes.len(),
            "preview rendered"
        );
        Ok(PreviewImage::png_for(document, bytes))
    }
}

impl Default for PdftoppmRenderer {
    fn default() -> Self {
        Self::new("pdftoppm", Self::DEFAULT_DPI)
    }
}

impl PreviewRenderer for PdftoppmRenderer {
    fn render<'a>(
        &'a self,
        document: &'a Document,
    ) -> BoxFuture<'a, Result<PreviewImage, PreviewError>> {
        Box::pin(self.convert(document))
    }
}
