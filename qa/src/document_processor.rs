use crate::error::{QaError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Turns a stored document into raw text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document_path: &Path) -> Result<String>;
}

/// Extractor backed by `pdf_extract`, run on the blocking pool.
#[derive(Debug, Default, Clone)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document_path: &Path) -> Result<String> {
        let path: PathBuf = document_path.to_path_buf();
        log::info!("Processing PDF: {}", path.display());

        // pdf_extract can panic on malformed input; the join error carries that out.
        let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| QaError::ExternalService(format!("PDF parser aborted: {}", e)))?;

        let text = extracted
            .map_err(|e| QaError::ExternalService(format!("PDF parsing failed: {}", e)))?;

        log::info!("Extracted {} characters", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_dependencies::minimal_pdf;

    #[tokio::test]
    async fn text_is_extracted_from_a_real_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, minimal_pdf("Hello")).unwrap();

        let text = PdfTextExtractor::new().extract(&path).await.unwrap();

        assert!(text.contains("Hello"), "extracted {:?}", text);
    }

    #[tokio::test]
    async fn empty_file_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"").unwrap();

        let err = PdfTextExtractor::new().extract(&path).await.unwrap_err();

        assert!(matches!(err, QaError::ExternalService(_)));
    }

    #[tokio::test]
    async fn non_pdf_bytes_are_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfTextExtractor::new().extract(&path).await.unwrap_err();

        assert!(matches!(err, QaError::ExternalService(_)));
    }

    #[tokio::test]
    async fn missing_document_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = PdfTextExtractor::new()
            .extract(&dir.path().join("missing.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::ExternalService(_)));
    }
}
