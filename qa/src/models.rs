use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionState {
    Pending,
    Completed,
    Failed,
}

/// Outcome of the most recent extraction for one slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStatus {
    pub upload_id: Uuid,
    pub state: ExtractionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<usize>,
}

impl ExtractionStatus {
    pub fn pending(upload_id: Uuid) -> Self {
        Self {
            upload_id,
            state: ExtractionState::Pending,
            characters: None,
        }
    }

    pub fn completed(upload_id: Uuid, characters: usize) -> Self {
        Self {
            upload_id,
            state: ExtractionState::Completed,
            characters: Some(characters),
        }
    }

    /// The cause is logged where the failure happens and never reported.
    pub fn failed(upload_id: Uuid) -> Self {
        Self {
            upload_id,
            state: ExtractionState::Failed,
            characters: None,
        }
    }
}
