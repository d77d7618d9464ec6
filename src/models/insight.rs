use serde::{Deserialize, Serialize};

/// Shown instead of generated advice when the text backend fails.
pub const INSIGHT_FALLBACK: &str = "Insights could not be generated due to an API error.";

/// Free-text advice returned to the farmer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightResult {
    pub text: String,
    /// Raw failure detail for display; never used for control flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl InsightResult {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            diagnostic: None,
        }
    }

    pub fn fallback(diagnostic: impl Into<String>) -> Self {
        Self {
            text: INSIGHT_FALLBACK.to_string(),
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.diagnostic.is_some()
    }
}

impl std::fmt::Display for InsightResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
