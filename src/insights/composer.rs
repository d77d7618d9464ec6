use super::{GenerationConfig, InsightBackend, Prompt};
use crate::models::{Advisory, Crop, InsightResult, SizeCategory, WeatherPayload};

/// Turns a selection, its weather and the rule advisories into free-text advice.
///
/// Backend failures never escape: they become the fallback message with the
/// error text attached as a diagnostic.
pub struct InsightComposer {
    backend: Box<dyn InsightBackend>,
    generation: GenerationConfig,
}

impl InsightComposer {
    pub fn new(backend: Box<dyn InsightBackend>, generation: GenerationConfig) -> Self {
        Self {
            backend,
            generation,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn compose<'a>(
        &self,
        crops: impl IntoIterator<Item = &'a Crop>,
        size: SizeCategory,
        payload: &WeatherPayload,
        advisories: &[Advisory],
    ) -> InsightResult {
        let prompt = Prompt::build(crops, size, payload, advisories);
        tracing::debug!(
            backend = self.backend.name(),
            prompt_len = prompt.user.len(),
            "Requesting insights"
        );

        match self.backend.generate(&prompt, &self.generation).await {
            Ok(text) => InsightResult::generated(text),
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), "Insight generation failed: {}", e);
                InsightResult::fallback(e.to_string())
            }
        }
    }

    pub async fn test_connection(&self) -> bool {
        match self.backend.test_connection().await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), "Connection test failed: {}", e);
                false
            }
        }
    }
}
