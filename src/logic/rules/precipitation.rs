use super::{first_reading, Rule};
use crate::models::{format_reading, Advisory, AdvisoryCategory, ParameterCode, WeatherPayload};

/// Below this daily depth (mm) irrigation is suggested.
const LOW_PRECIPITATION_MM: f64 = 5.0;

/// Precipitation rule - suggests irrigation when the first day is dry
///
/// Conditions:
/// - `PRECTOTCORR` present and its first reading not missing
///
/// Outcome:
/// - Low: reading < 5 mm, irrigation suggested
/// - Sufficient: reading >= 5 mm, irrigation not necessary
pub struct PrecipitationRule;

impl Rule for PrecipitationRule {
    fn id(&self) -> &'static str {
        "precipitation_irrigation"
    }

    fn name(&self) -> &'static str {
        "Precipitation / Irrigation"
    }

    fn evaluate(&self, payload: &WeatherPayload) -> Option<Advisory> {
        let precip = first_reading(payload, ParameterCode::Precipitation)?;
        let low = precip < LOW_PRECIPITATION_MM;

        let message = if low {
            format!(
                "Low precipitation ({} mm). Irrigation suggested.",
                format_reading(precip)
            )
        } else {
            format!(
                "Sufficient precipitation ({} mm). Irrigation not necessary.",
                format_reading(precip)
            )
        };

        Some(Advisory::new(
            self.id(),
            AdvisoryCategory::Irrigation,
            low,
            precip,
            message,
        ))
    }
}
