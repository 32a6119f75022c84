use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    Json,
};
use pdf_qa::{ExtractionStatus, SlotKey};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api_error::ApiError;
use crate::app::AppState;
use crate::ask_payload::AskPayload;
use crate::ask_response::AskResponse;
use crate::upload_response::UploadResponse;

const FILE_FIELD: &str = "pdf";
const SESSION_FIELD: &str = "session";

pub const NO_FILE_MESSAGE: &str = "No file uploaded.";

/// POST /upload
///
/// Accepts exactly one `pdf` file part plus an optional `session` text part.
/// The stored name is fixed by the slot, never taken from the client. An
/// empty file part is still a file; extraction reports it as failed.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    // A request that is not multipart at all carries no file.
    let mut multipart = multipart.map_err(|_| ApiError::bad_request(NO_FILE_MESSAGE))?;

    let mut file: Option<Bytes> = None;
    let mut session: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                if file.is_some() {
                    return Err(ApiError::bad_request("Only one file may be uploaded."));
                }
                file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::new(e.status(), e.body_text()))?,
                );
            }
            Some(SESSION_FIELD) => {
                session = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::new(e.status(), e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    let key = SlotKey::from_session(session.as_deref())?;
    let file = file.ok_or_else(|| ApiError::bad_request(NO_FILE_MESSAGE))?;

    let outcome = state.uploads.upload(&key, &file).await.map_err(|e| {
        log::error!("Error uploading or parsing PDF: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(outcome.into()))
}

/// POST /ask
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskPayload>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(payload) =
        payload.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;

    let key = SlotKey::from_session(payload.session.as_deref())?;
    let answer = state
        .queries
        .answer(&key, payload.question.as_deref())
        .await
        .map_err(ApiError::masked)?;

    Ok(Json(AskResponse { answer }))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub session: Option<String>,
}

/// GET /status
pub async fn status(
    State(state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<ExtractionStatus>, ApiError> {
    let Query(query) =
        query.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
    let key = SlotKey::from_session(query.session.as_deref())?;
    state
        .uploads
        .status(&key)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No upload recorded for this session."))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
