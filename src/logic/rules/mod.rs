pub mod engine;
pub mod precipitation;
pub mod uv_index;
pub mod wind;

pub use engine::SuggestionEngine;

use crate::models::{Advisory, ParameterCode, WeatherPayload};

/// Trait for weather advisory rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return an advisory if its input is available
    fn evaluate(&self, payload: &WeatherPayload) -> Option<Advisory>;
}

/// First chronological reading of a parameter, if present and not missing.
///
/// A missing first day yields `None` even when later days have data.
pub fn first_reading(payload: &WeatherPayload, parameter: ParameterCode) -> Option<f64> {
    payload.get(parameter)?.first()?.value
}
