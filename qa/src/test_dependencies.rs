// Mock collaborators for tests.
//
// Compiled for this crate's unit tests and, through the `test-util` feature,
// for downstream crates that need to drive the services without a PDF parser
// or a live completion endpoint.

use crate::completion_service::CompletionService;
use crate::document_processor::TextExtractor;
use crate::error::{QaError, Result};
use crate::models::ChatRequest;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub const MOCK_ANSWER: &str = "Mock answer";

// =============================================================================
// Mock Text Extractor
// =============================================================================

/// Treats the stored document bytes as UTF-8 text, prefixed with `extracted:`.
pub struct MockTextExtractor {
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<PathBuf>>,
}

impl MockTextExtractor {
    pub fn new() -> Self {
        Self {
            failure: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every extraction fails with this message
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Sleep before reading the document, to widen race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    /// The text this extractor produces for the given document bytes
    pub fn expected_text(bytes: &[u8]) -> String {
        format!("extracted: {}", String::from_utf8_lossy(bytes))
    }
}

impl Default for MockTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for MockTextExtractor {
    async fn extract(&self, document_path: &Path) -> Result<String> {
        self.calls.lock().unwrap().push(document_path.to_path_buf());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(QaError::ExternalService(message.clone()));
        }

        let bytes = tokio::fs::read(document_path).await?;
        Ok(Self::expected_text(&bytes))
    }
}

// =============================================================================
// Test Documents
// =============================================================================

/// A one-page PDF that shows `text` in Helvetica, with a valid xref table.
///
/// `text` must not contain parentheses or backslashes.
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    let stream = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", stream.len(), stream),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref = pdf.len();
    let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        table.push_str(&format!("{:010} 00000 n \n", offset));
    }
    table.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref
    ));
    pdf.extend_from_slice(table.as_bytes());
    pdf
}

// =============================================================================
// Mock Completion Service
// =============================================================================

enum MockReply {
    Content(Option<String>),
    Failure(String),
}

/// Replays queued replies in order, then answers `MOCK_ANSWER`.
pub struct MockCompletionService {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockCompletionService {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_answer(self, answer: &str) -> Self {
        self.push(MockReply::Content(Some(answer.to_string())))
    }

    /// Next reply carries no content, like a choice with `content: null`
    pub fn with_no_content(self) -> Self {
        self.push(MockReply::Content(None))
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.push(MockReply::Failure(message.to_string()))
    }

    /// All requests received, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }
}

impl Default for MockCompletionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, request: ChatRequest) -> Result<Option<String>> {
        self.requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Content(content)) => Ok(content),
            Some(MockReply::Failure(message)) => Err(QaError::ExternalService(message)),
            None => Ok(Some(MOCK_ANSWER.to_string())),
        }
    }
}
