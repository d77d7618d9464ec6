use super::{first_reading, Rule};
use crate::models::{format_reading, Advisory, AdvisoryCategory, ParameterCode, WeatherPayload};

/// Above this speed (m/s) spraying drifts.
const STRONG_WIND_MS: f64 = 5.0;

/// Wind rule - holds spraying when wind at 10m exceeds 5 m/s
pub struct WindRule;

impl Rule for WindRule {
    fn id(&self) -> &'static str {
        "wind_spraying"
    }

    fn name(&self) -> &'static str {
        "Wind / Spraying"
    }

    fn evaluate(&self, payload: &WeatherPayload) -> Option<Advisory> {
        let wind = first_reading(payload, ParameterCode::WindSpeed10m)?;
        let strong = wind > STRONG_WIND_MS;

        let message = if strong {
            format!(
                "Strong wind ({} m/s). Spraying not recommended.",
                format_reading(wind)
            )
        } else {
            format!(
                "Suitable conditions for spraying ({} m/s).",
                format_reading(wind)
            )
        };

        Some(Advisory::new(
            self.id(),
            AdvisoryCategory::Spraying,
            strong,
            wind,
            message,
        ))
    }
}
