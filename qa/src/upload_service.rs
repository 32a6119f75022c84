use crate::document_processor::TextExtractor;
use crate::error::Result;
use crate::models::ExtractionStatus;
use crate::slot_store::{SlotKey, SlotStore};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub upload_id: Uuid,
    pub document_path: PathBuf,
    pub status: ExtractionStatus,
}

/// Stores uploaded documents and extracts their text into the matching slot.
pub struct UploadService {
    store: Arc<SlotStore>,
    extractor: Arc<dyn TextExtractor>,
    statuses: Mutex<HashMap<SlotKey, ExtractionStatus>>,
}

impl UploadService {
    pub fn new(store: Arc<SlotStore>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            store,
            extractor,
            statuses: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the slot's document and text.
    ///
    /// The slot stays locked until extraction finishes, so a question can only
    /// ever see text that belongs to the document currently stored. A failed
    /// extraction is reported in the outcome, not as an error: the document
    /// itself was stored and the text slot is left empty.
    pub async fn upload(&self, key: &SlotKey, bytes: &[u8]) -> Result<UploadOutcome> {
        let _slot = self.store.lock(key).await;
        let upload_id = Uuid::new_v4();
        log::info!(
            "Upload {} into slot '{}' ({} bytes)",
            upload_id,
            key,
            bytes.len()
        );
        self.record(key, ExtractionStatus::pending(upload_id));

        let document_path = match self.replace_document(key, bytes).await {
            Ok(path) => path,
            Err(e) => {
                log::error!("Error storing upload {}: {}", upload_id, e);
                self.record(key, ExtractionStatus::failed(upload_id));
                return Err(e);
            }
        };

        let status = match self.extractor.extract(&document_path).await {
            Ok(text) => {
                if let Err(e) = self.store.write_text(key, &text).await {
                    log::error!("Error saving extracted text for {}: {}", upload_id, e);
                    self.record(key, ExtractionStatus::failed(upload_id));
                    return Err(e);
                }
                log::info!("Done. Upload {} yielded {} characters", upload_id, text.chars().count());
                ExtractionStatus::completed(upload_id, text.chars().count())
            }
            Err(e) => {
                log::error!("Error parsing upload {}: {}", upload_id, e);
                ExtractionStatus::failed(upload_id)
            }
        };
        self.record(key, status.clone());

        Ok(UploadOutcome {
            upload_id,
            document_path,
            status,
        })
    }

    /// Latest extraction status for the slot, including one still in flight.
    pub fn status(&self, key: &SlotKey) -> Option<ExtractionStatus> {
        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    async fn replace_document(&self, key: &SlotKey, bytes: &[u8]) -> Result<PathBuf> {
        self.store.clear_text(key).await?;
        self.store.write_document(key, bytes).await
    }

    fn record(&self, key: &SlotKey, status: ExtractionStatus) {
        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.clone(), status);
    }
}
