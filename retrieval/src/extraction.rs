//! Turning source documents into plain text.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, RetrievalError};

/// Converts a document's native byte format into plain text.
pub trait TextExtractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Extract the document text, failing with
    /// [`RetrievalError::Extraction`] for corrupt or unreadable input.
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// UTF-8 text documents (plain text, Markdown).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "text"
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|e| RetrievalError::Extraction(format!("document is not valid UTF-8: {e}")))?;
        Ok(text.to_string())
    }
}

/// PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed inputs.
        let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| RetrievalError::Extraction("PDF parser aborted on malformed input".to_string()))?;

        let text = extracted
            .map_err(|e| RetrievalError::Extraction(format!("failed to read PDF: {e}")))?;
        debug!("Extracted {} characters from PDF", text.chars().count());
        Ok(text)
    }
}

/// Pick an extractor from a file's extension: `pdf` means PDF, anything
/// else is read as plain text.
pub fn extractor_for_path(path: &Path) -> Arc<dyn TextExtractor> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        Arc::new(PdfExtractor)
    } else {
        Arc::new(PlainTextExtractor)
    }
}
