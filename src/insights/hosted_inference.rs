use super::{ensure_success, BackendError, GenerationConfig, InsightBackend, Prompt};
use crate::config::HostedInferenceConfig;
use async_trait::async_trait;
use serde::Serialize;

/// Hosted text-generation endpoint (`POST {model_url}` with `inputs` and `parameters`).
pub struct HostedInferenceBackend {
    client: reqwest::Client,
    config: HostedInferenceConfig,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: String,
    parameters: &'a GenerationConfig,
}

impl HostedInferenceBackend {
    pub fn new(client: reqwest::Client, config: HostedInferenceConfig) -> Self {
        Self { client, config }
    }

    /// Pulls `generated_text` out of the first element of the response array.
    fn extract_text(body: &serde_json::Value) -> Result<String, BackendError> {
        let first = body
            .as_array()
            .and_then(|items| items.first())
            .ok_or_else(|| {
                BackendError::InvalidResponse(format!("expected a non-empty array, got {}", body))
            })?;

        let text = first
            .get("generated_text")
            .and_then(|t| t.as_str())
            .map(str::trim)
            .ok_or_else(|| {
                BackendError::InvalidResponse(format!("missing generated_text in {}", first))
            })?;

        if text.is_empty() {
            return Err(BackendError::InvalidResponse(
                "generated_text is empty".into(),
            ));
        }

        Ok(text.to_string())
    }
}

#[async_trait]
impl InsightBackend for HostedInferenceBackend {
    fn name(&self) -> &'static str {
        "hosted-inference"
    }

    async fn generate(
        &self,
        prompt: &Prompt,
        generation: &GenerationConfig,
    ) -> Result<String, BackendError> {
        let body = InferenceRequest {
            inputs: prompt.combined(),
            parameters: generation,
        };

        let response = self
            .client
            .post(&self.config.model_url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let parsed: serde_json::Value = response.json().await.map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse inference response: {}", e))
        })?;

        Self::extract_text(&parsed)
    }

    async fn test_connection(&self) -> Result<bool, BackendError> {
        let response = self
            .client
            .get(&self.config.model_url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn backend_for(server: &MockServer) -> HostedInferenceBackend {
        HostedInferenceBackend::new(
            reqwest::Client::new(),
            HostedInferenceConfig {
                token: "hf_test".to_string(),
                model_url: format!("{}/models/agro-llm", server.uri()),
            },
        )
    }

    fn prompt() -> Prompt {
        Prompt {
            system: "persona".to_string(),
            user: "question".to_string(),
        }
    }

    #[tokio::test]
    async fn sends_generation_parameters_and_trims_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/agro-llm"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_partial_json(serde_json::json!({
                "inputs": "persona\n\nquestion",
                "parameters": {
                    "max_new_tokens": 500,
                    "top_k": 50,
                    "return_full_text": false
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "\n  Rotate soybean with corn.  \n"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let text = backend_for(&server)
            .generate(&prompt(), &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "Rotate soybean with corn.");
    }

    #[tokio::test]
    async fn service_unavailable_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/agro-llm"))
            .respond_with(
                ResponseTemplate::new(503).set_body_string(r#"{"error":"Model is loading"}"#),
            )
            .mount(&server)
            .await;

        let err = backend_for(&server)
            .generate(&prompt(), &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 503, .. }));
        assert!(err.to_string().contains("Model is loading"));
    }

    #[test]
    fn error_object_instead_of_array_is_invalid() {
        let body = serde_json::json!({"error": "rate limited"});
        let err = HostedInferenceBackend::extract_text(&body).unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }

    #[test]
    fn missing_generated_text_is_invalid() {
        let body = serde_json::json!([{"summary_text": "x"}]);
        assert!(HostedInferenceBackend::extract_text(&body).is_err());

        let body = serde_json::json!([]);
        assert!(HostedInferenceBackend::extract_text(&body).is_err());

        let body = serde_json::json!([{"generated_text": "   "}]);
        assert!(HostedInferenceBackend::extract_text(&body).is_err());
    }

    #[test]
    fn only_first_generation_is_used() {
        let body = serde_json::json!([
            {"generated_text": "first"},
            {"generated_text": "second"}
        ]);
        assert_eq!(HostedInferenceBackend::extract_text(&body).unwrap(), "first");
    }
}
