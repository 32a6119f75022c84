pub mod completion_service;
pub mod config;
pub mod document_processor;
pub mod error;
pub mod models;
pub mod query_service;
pub mod slot_store;
pub mod upload_service;

#[cfg(any(test, feature = "test-util"))]
pub mod test_dependencies;

pub use completion_service::{CompletionService, OpenAiCompletionService};
pub use config::Config;
pub use document_processor::{PdfTextExtractor, TextExtractor};
pub use error::{QaError, Result};
pub use models::*;
pub use query_service::QueryService;
pub use slot_store::{SlotKey, SlotStore};
pub use upload_service::{UploadOutcome, UploadService};
