use pdf_qa::{ExtractionState, ExtractionStatus, UploadOutcome};
use serde::Serialize;
use uuid::Uuid;

pub const UPLOAD_PARSED_MESSAGE: &str = "PDF uploaded and parsed successfully.";
pub const UPLOAD_UNPARSED_MESSAGE: &str = "PDF uploaded but text extraction failed.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_path: String,
    pub upload_id: Uuid,
    pub extraction: ExtractionStatus,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        let message = match outcome.status.state {
            ExtractionState::Completed => UPLOAD_PARSED_MESSAGE,
            _ => UPLOAD_UNPARSED_MESSAGE,
        };

        Self {
            message: message.to_string(),
            file_path: outcome.document_path.display().to_string(),
            upload_id: outcome.upload_id,
            extraction: outcome.status,
        }
    }
}
