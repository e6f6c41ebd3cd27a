use crate::error::CoreError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Uploads larger than this are refused before anything is stored.
pub const MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

/// A raw document as handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            bytes,
        }
    }

    /// Check the document is a non-empty PDF within the size limit.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.bytes.is_empty() {
            return Err(CoreError::EmptyDocument {
                file_name: self.file_name.clone(),
            });
        }
        if self.bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(CoreError::DocumentTooLarge {
                size: self.bytes.len(),
                limit: MAX_DOCUMENT_BYTES,
            });
        }
        if !is_pdf(&self.bytes) {
            return Err(CoreError::UnsupportedDocument {
                file_name: self.file_name.clone(),
            });
        }
        Ok(())
    }

    /// File name stem, used to name the derived preview (`cv.pdf` → `cv`).
    pub fn stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}
