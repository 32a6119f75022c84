use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use pdf_qa::{
    CompletionService, Config, OpenAiCompletionService, PdfTextExtractor, QueryService,
    SlotStore, TextExtractor, UploadService,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub uploads: Arc<UploadService>,
    pub queries: Arc<QueryService>,
}

impl AppState {
    pub fn new(
        store: Arc<SlotStore>,
        extractor: Arc<dyn TextExtractor>,
        completion: Arc<dyn CompletionService>,
        model: &str,
    ) -> Self {
        Self {
            uploads: Arc::new(UploadService::new(store.clone(), extractor)),
            queries: Arc::new(QueryService::new(store, completion, model)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(SlotStore::new(config.upload_dir.clone(), config.text_dir.clone()));
        Self::new(
            store,
            Arc::new(PdfTextExtractor::new()),
            Arc::new(OpenAiCompletionService::from_config(config)),
            &config.model,
        )
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/ask", post(handlers::ask))
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
