use crate::completion_service::CompletionService;
use crate::error::{QaError, Result};
use crate::models::{ChatRequest, Message};
use crate::slot_store::{SlotKey, SlotStore};
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const FALLBACK_ANSWER: &str = "No answer available.";
pub const NO_CONTENT_MESSAGE: &str = "No parsed PDF content found. Please upload a valid PDF first.";
pub const NO_QUESTION_MESSAGE: &str = "No question provided";

/// Answers questions against the extracted text of one slot.
pub struct QueryService {
    store: Arc<SlotStore>,
    completion: Arc<dyn CompletionService>,
    model: String,
}

impl QueryService {
    pub fn new(
        store: Arc<SlotStore>,
        completion: Arc<dyn CompletionService>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            completion,
            model: model.into(),
        }
    }

    pub async fn answer(&self, key: &SlotKey, question: Option<&str>) -> Result<String> {
        let content = if self.store.has_text(key).await? {
            let _slot = self.store.lock(key).await;
            self.store.read_text(key).await?
        } else {
            None
        };
        let content = content.ok_or_else(|| QaError::NotFound(NO_CONTENT_MESSAGE.into()))?;

        let question = question
            .filter(|q| !q.is_empty())
            .ok_or_else(|| QaError::Input(NO_QUESTION_MESSAGE.into()))?;

        log::info!(
            "Answering a {}-character question against slot '{}' ({} characters of text)",
            question.chars().count(),
            key,
            content.chars().count()
        );

        let request = build_request(&self.model, &content, question);
        let answer = self.completion.complete(request).await?;

        Ok(answer
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string()))
    }
}

pub fn build_request(model: &str, content: &str, question: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(build_prompt(content, question)),
        ],
    }
}

fn build_prompt(content: &str, question: &str) -> String {
    format!(
        "The following is the text of a PDF document:\n\n{content}\n\nBased on using only this text, answer the following question:\n{question}"
    )
}
