use super::{precipitation::PrecipitationRule, uv_index::UvIndexRule, wind::WindRule, Rule};
use crate::models::{Advisory, WeatherPayload};

/// Runs the advisory rules in their fixed order: precipitation, UV, wind.
pub struct SuggestionEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl SuggestionEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(PrecipitationRule),
            Box::new(UvIndexRule),
            Box::new(WindRule),
        ];

        Self { rules }
    }

    pub fn derive_advisories(&self, payload: &WeatherPayload) -> Vec<Advisory> {
        let advisories: Vec<Advisory> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(payload))
            .collect();
        tracing::debug!(count = advisories.len(), "Derived advisories");
        advisories
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}
