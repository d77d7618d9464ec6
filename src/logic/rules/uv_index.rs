use super::{first_reading, Rule};
use crate::models::{format_reading, Advisory, AdvisoryCategory, ParameterCode, WeatherPayload};

const HIGH_UV_INDEX: f64 = 8.0;

/// UV rule - advises plant protection on high UV days (index >= 8)
pub struct UvIndexRule;

impl Rule for UvIndexRule {
    fn id(&self) -> &'static str {
        "uv_protection"
    }

    fn name(&self) -> &'static str {
        "UV Index"
    }

    fn evaluate(&self, payload: &WeatherPayload) -> Option<Advisory> {
        let uv = first_reading(payload, ParameterCode::UvIndex)?;
        let high = uv >= HIGH_UV_INDEX;

        let message = if high {
            format!("High UV index ({}). Protect the plants.", format_reading(uv))
        } else {
            format!("Safe UV index ({}). No action needed.", format_reading(uv))
        };

        Some(Advisory::new(
            self.id(),
            AdvisoryCategory::UvExposure,
            high,
            uv,
            message,
        ))
    }
}
