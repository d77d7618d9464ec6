use crate::models::{Advisory, Crop, SizeCategory, WeatherPayload};

/// Persona for backends that take a separate system message.
pub const AGRONOMIST_PERSONA: &str = "You are an agronomist specialized in plant pathology \
     and in optimizing agricultural production.";

/// System and user text sent to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn build<'a>(
        crops: impl IntoIterator<Item = &'a Crop>,
        size: SizeCategory,
        payload: &WeatherPayload,
        advisories: &[Advisory],
    ) -> Self {
        let crops = crops
            .into_iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let suggestions = advisories
            .iter()
            .map(|a| a.message.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let user = format!(
            "The farmer selected the following options:\n\
             - Crops: {crops}\n\
             - Crop area size: {size}\n\
             - Weather data: {weather}\n\
             \n\
             Based on the information above, provide useful insights and recommended \
             strategies for the farmer. Here are some initial suggestions:\n\
             {suggestions}\n\
             \n\
             Generate further personalized suggestions and insights. Be objective and brief.\n\
             The output must not be in markdown format. Write in plain text.",
            size = size.as_str(),
            weather = payload.dump(),
        );

        Self {
            system: AGRONOMIST_PERSONA.to_string(),
            user,
        }
    }

    /// Single-string form for backends without a system role.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}
