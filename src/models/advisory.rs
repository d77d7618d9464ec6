use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvisoryCategory {
    Irrigation,
    UvExposure,
    Spraying,
}

impl AdvisoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCategory::Irrigation => "Irrigation",
            AdvisoryCategory::UvExposure => "UV Exposure",
            AdvisoryCategory::Spraying => "Spraying",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            AdvisoryCategory::Irrigation => Color::Blue,
            AdvisoryCategory::UvExposure => Color::Magenta,
            AdvisoryCategory::Spraying => Color::Cyan,
        }
    }
}

impl std::fmt::Display for AdvisoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One rule's conclusion about the first reading of its parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub rule_id: String,
    pub category: AdvisoryCategory,
    /// True when the farmer should act (irrigate, protect, hold spraying).
    pub action_needed: bool,
    /// Reading the decision was made on.
    pub value: f64,
    pub message: String,
}

impl Advisory {
    pub fn new(
        rule_id: impl Into<String>,
        category: AdvisoryCategory,
        action_needed: bool,
        value: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            category,
            action_needed,
            value,
            message: message.into(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        if self.action_needed {
            "⚠"
        } else {
            "ℹ"
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
