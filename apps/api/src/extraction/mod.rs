//! Text Extraction — turns an uploaded resume or job description into plain text.
//!
//! Supported formats are a closed set: PDF and DOCX. Everything else is rejected
//! up front with `ExtractionError::UnsupportedFormat`. Extraction is all-or-nothing:
//! a parse failure never yields partial text.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

mod docx;
mod pdf;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type '{0}'. Only PDF and DOCX are supported.")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from {format} document: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// The format of an incoming document, resolved once from its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    /// Carries the offending media type or extension for the error message.
    Unsupported(String),
}

impl DocumentFormat {
    /// Resolves the format from a declared media type, falling back to the file extension.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Self {
        let media_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

        match media_type.as_deref() {
            Some(PDF_MEDIA_TYPE) => return DocumentFormat::Pdf,
            Some(DOCX_MEDIA_TYPE) => return DocumentFormat::Docx,
            _ => {}
        }

        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => DocumentFormat::Pdf,
            Some("docx") => DocumentFormat::Docx,
            Some(ext) => DocumentFormat::Unsupported(
                media_type.unwrap_or_else(|| format!(".{ext}")),
            ),
            None => DocumentFormat::Unsupported(media_type.unwrap_or_else(|| "unknown".to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Unsupported(label) => label,
        }
    }
}

/// An uploaded document: raw bytes plus the format they are declared as.
/// Owned by the caller; extraction only borrows it.
#[derive(Debug, Clone)]
pub struct Document {
    pub format: DocumentFormat,
    pub bytes: bytes::Bytes,
}

impl Document {
    pub fn new(format: DocumentFormat, bytes: impl Into<bytes::Bytes>) -> Self {
        Self {
            format,
            bytes: bytes.into(),
        }
    }
}

/// Extracts plain text from a document, dispatching on its format.
pub fn extract(document: &Document) -> Result<String, ExtractionError> {
    let text = match &document.format {
        DocumentFormat::Pdf => pdf::extract_text(&document.bytes)?,
        DocumentFormat::Docx => docx::extract_text(&document.bytes)?,
        DocumentFormat::Unsupported(label) => {
            return Err(ExtractionError::UnsupportedFormat(label.clone()))
        }
    };

    debug!(
        "Extracted {} chars from {} document ({} bytes)",
        text.len(),
        document.format.label(),
        document.bytes.len()
    );

    Ok(text)
}

/// Reads a document from disk and extracts its text.
/// The format is checked before the file is opened.
#[cfg(test)]
pub fn extract_file(path: &Path, content_type: Option<&str>) -> Result<String, ExtractionError> {
    let format = DocumentFormat::detect(path.to_str(), content_type);
    if let DocumentFormat::Unsupported(label) = format {
        return Err(ExtractionError::UnsupportedFormat(label));
    }

    let bytes = std::fs::read(path)?;
    extract(&Document::new(format, bytes))
}
