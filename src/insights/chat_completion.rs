use super::{ensure_success, BackendError, GenerationConfig, InsightBackend, Prompt};
use crate::config::ChatCompletionConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat-completion API client (`POST {base_url}/chat/completions`).
pub struct ChatCompletionBackend {
    client: reqwest::Client,
    config: ChatCompletionConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionBackend {
    pub fn new(client: reqwest::Client, config: ChatCompletionConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn extract_text(response: ChatResponse) -> Result<String, BackendError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::InvalidResponse("no choices in response".into()))?;

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(BackendError::InvalidResponse(
                "first choice has no message content".into(),
            )),
        }
    }
}

#[async_trait]
impl InsightBackend for ChatCompletionBackend {
    fn name(&self) -> &'static str {
        "chat-completion"
    }

    /// The chat endpoint runs with its own sampling defaults; `generation` is not sent.
    async fn generate(
        &self,
        prompt: &Prompt,
        _generation: &GenerationConfig,
    ) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse chat completion: {}", e))
        })?;

        Self::extract_text(parsed)
    }

    async fn test_connection(&self) -> Result<bool, BackendError> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
