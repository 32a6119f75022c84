use crate::config::Config;
use crate::error::{QaError, Result};
use crate::models::{ChatCompletionResponse, ChatRequest};
use async_trait::async_trait;
use reqwest::Client;

/// A chat-completion backend. Returns the first choice's content, if any.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<Option<String>>;
}

pub struct OpenAiCompletionService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompletionService {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.openai_api_key.clone(), config.openai_base_url.clone())
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn complete(&self, request: ChatRequest) -> Result<Option<String>> {
        let start_time = std::time::Instant::now();
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| QaError::ExternalService(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("OpenAI API error {}: {}", status, error_text);
            return Err(QaError::ExternalService(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| QaError::ExternalService(format!("Unreadable OpenAI response: {}", e)))?;

        log::info!(
            "OpenAI completion with {} finished in {}ms",
            request.model,
            start_time.elapsed().as_millis()
        );

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}
