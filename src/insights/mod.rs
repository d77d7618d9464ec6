//! Free-text agronomic advice from a text-generation backend.
//!
//! Two interchangeable backends are supported: a chat-completion API and a
//! hosted-inference API. Both sit behind [`InsightBackend`]; which one is used
//! is decided once from configuration.

pub mod chat_completion;
pub mod composer;
pub mod hosted_inference;
pub mod prompt;

pub use chat_completion::ChatCompletionBackend;
pub use composer::InsightComposer;
pub use hosted_inference::HostedInferenceBackend;
pub use prompt::Prompt;

use crate::config::{BackendKind, InsightsConfig};
use crate::error::{AgroInsightError, Result as AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a text-generation backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::RequestFailed(err.to_string())
    }
}

/// Sampling options sent to backends that accept them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    /// Echo the prompt in front of the generated text.
    pub return_full_text: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 500,
            temperature: 0.7,
            top_k: 50,
            top_p: 0.95,
            return_full_text: false,
        }
    }
}

/// A text-generation service producing plain-text advice.
#[async_trait]
pub trait InsightBackend: Send + Sync {
    /// Short backend name for logs and status lines
    fn name(&self) -> &'static str;

    /// Generate text for the prompt
    async fn generate(
        &self,
        prompt: &Prompt,
        generation: &GenerationConfig,
    ) -> Result<String, BackendError>;

    /// Check that the backend is reachable with the configured credential
    async fn test_connection(&self) -> Result<bool, BackendError>;
}

/// Fails fast on a non-success status, keeping the body for diagnostics.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Build the backend selected in configuration.
pub fn backend_from_config(
    client: reqwest::Client,
    config: &InsightsConfig,
) -> AppResult<Box<dyn InsightBackend>> {
    let missing = |section: &str| {
        AgroInsightError::Config(format!(
            "insights.backend is {} but the {} section is missing",
            config.backend.as_str(),
            section
        ))
    };

    match config.backend {
        BackendKind::ChatCompletion => {
            let settings = config
                .chat_completion
                .clone()
                .ok_or_else(|| missing("chat_completion"))?;
            Ok(Box::new(ChatCompletionBackend::new(client, settings)))
        }
        BackendKind::HostedInference => {
            let settings = config
                .hosted_inference
                .clone()
                .ok_or_else(|| missing("hosted_inference"))?;
            Ok(Box::new(HostedInferenceBackend::new(client, settings)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChatCompletionConfig, HostedInferenceConfig};

    #[test]
    fn factory_follows_selected_backend() {
        let mut config = InsightsConfig {
            chat_completion: Some(ChatCompletionConfig {
                api_key: "sk-abc".into(),
                base_url: "https://api.openai.com/v1".into(),
                model: "gpt-4".into(),
            }),
            hosted_inference: Some(HostedInferenceConfig {
                token: "hf_abc".into(),
                model_url: "https://example.invalid/model".into(),
            }),
            ..InsightsConfig::default()
        };

        let backend = backend_from_config(reqwest::Client::new(), &config).unwrap();
        assert_eq!(backend.name(), "chat-completion");

        config.backend = BackendKind::HostedInference;
        let backend = backend_from_config(reqwest::Client::new(), &config).unwrap();
        assert_eq!(backend.name(), "hosted-inference");
    }

    #[test]
    fn factory_rejects_missing_section() {
        let config = InsightsConfig {
            backend: BackendKind::HostedInference,
            ..InsightsConfig::default()
        };
        assert!(matches!(
            backend_from_config(reqwest::Client::new(), &config),
            Err(AgroInsightError::Config(_))
        ));
    }
}
