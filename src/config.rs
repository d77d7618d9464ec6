use crate::error::{AgroInsightError, Result};
use crate::insights::GenerationConfig;
use crate::models::{DatePolicy, SentinelPolicy};
use chrono::NaiveDate;
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub power: PowerConfig,
    pub insights: InsightsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PowerConfig {
    pub base_url: String,
    pub community: String,
    pub timeout_secs: u64,
    pub sentinel_policy: SentinelPolicy,
    pub date_policy: DatePolicy,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://power.larc.nasa.gov".into(),
            community: "AG".into(),
            timeout_secs: 60,
            sentinel_policy: SentinelPolicy::Exclude,
            date_policy: DatePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    ChatCompletion,
    HostedInference,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::ChatCompletion => "chat_completion",
            BackendKind::HostedInference => "hosted_inference",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InsightsConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_insights_timeout")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_completion: Option<ChatCompletionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_inference: Option<HostedInferenceConfig>,
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_insights_timeout() -> u64 {
    120
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::ChatCompletion,
            timeout_secs: default_insights_timeout(),
            chat_completion: None,
            hosted_inference: None,
            generation: GenerationConfig::default(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ChatCompletionConfig {
    pub api_key: String,
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
}

fn default_chat_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_chat_model() -> String {
    "gpt-4".into()
}

impl std::fmt::Debug for ChatCompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct HostedInferenceConfig {
    pub token: String,
    #[serde(default = "default_model_url")]
    pub model_url: String,
}

fn default_model_url() -> String {
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.3".into()
}

impl std::fmt::Debug for HostedInferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedInferenceConfig")
            .field("token", &"[REDACTED]")
            .field("model_url", &self.model_url)
            .finish()
    }
}

const ENV_PLACEHOLDER: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

/// A credential must be non-blank and must not still hold an unresolved `${VAR}`.
fn check_credential(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AgroInsightError::Config(format!("{} is empty", field)));
    }
    if let Some(var) = regex_lite::Regex::new(ENV_PLACEHOLDER)
        .ok()
        .and_then(|re| re.captures(value))
        .map(|cap| cap[1].to_string())
    {
        return Err(AgroInsightError::Config(format!(
            "{} refers to ${{{}}}, but {} is not set",
            field, var, var
        )));
    }
    Ok(())
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(AgroInsightError::Config(format!(
                "Config file not found at {:?}. Run `agroinsight init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AgroInsightError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::parse(&config_str)?;
        tracing::debug!(path = %config_path.display(), backend = config.insights.backend.as_str(), "Loaded configuration");
        Ok(config)
    }

    /// Parse YAML after `${VAR}` substitution and check it is usable.
    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AgroInsightError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Credentials for the selected backend must be present before any insight request.
    pub fn validate(&self) -> Result<()> {
        let policy = &self.power.date_policy;
        if policy.min_date > policy.max_date {
            return Err(AgroInsightError::Config(format!(
                "date_policy.min_date {} is after max_date {}",
                policy.min_date, policy.max_date
            )));
        }
        if policy.max_span_days == Some(0) {
            return Err(AgroInsightError::Config(
                "date_policy.max_span_days must be at least 1".into(),
            ));
        }

        match self.insights.backend {
            BackendKind::ChatCompletion => match &self.insights.chat_completion {
                Some(c) => check_credential("insights.chat_completion.api_key", &c.api_key),
                None => Err(AgroInsightError::Config(
                    "insights.backend is chat_completion but the chat_completion section is missing"
                        .into(),
                )),
            },
            BackendKind::HostedInference => match &self.insights.hosted_inference {
                Some(c) => check_credential("insights.hosted_inference.token", &c.token),
                None => Err(AgroInsightError::Config(
                    "insights.backend is hosted_inference but the hosted_inference section is missing"
                        .into(),
                )),
            },
        }
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/agroinsight/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgroInsightError::Config("Cannot determine config directory".into()))?
            .join("agroinsight");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive(target: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up AgroInsight!");
        println!();

        // --- Weather provider ---
        println!("NASA POWER");
        let defaults = PowerConfig::default();
        let min_date: NaiveDate = Input::new()
            .with_prompt("  Earliest selectable date (YYYY-MM-DD)")
            .default(defaults.date_policy.min_date)
            .interact_text()
            .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

        let max_date: NaiveDate = Input::new()
            .with_prompt("  Latest selectable date (YYYY-MM-DD)")
            .default(defaults.date_policy.max_date)
            .interact_text()
            .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

        let max_span: u32 = Input::new()
            .with_prompt("  Maximum range in days (0 for no limit)")
            .default(0)
            .interact_text()
            .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

        let sentinel_choice = Select::new()
            .with_prompt("  Days without data (-999)")
            .items(&["Exclude from advisories and charts", "Keep as values"])
            .default(0)
            .interact()
            .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Insights backend ---
        println!("Insights backend");
        let backend_choice = Select::new()
            .with_prompt("  Text generation service")
            .items(&["Chat completion API", "Hosted inference API"])
            .default(0)
            .interact()
            .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

        let mut insights = InsightsConfig::default();
        if backend_choice == 0 {
            let api_key: String = Password::new()
                .with_prompt("  API key (or ${VAR} placeholder)")
                .interact()
                .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

            let model: String = Input::new()
                .with_prompt("  Model")
                .default(default_chat_model())
                .interact_text()
                .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

            insights.backend = BackendKind::ChatCompletion;
            insights.chat_completion = Some(ChatCompletionConfig {
                api_key,
                base_url: default_chat_base_url(),
                model,
            });
        } else {
            let token: String = Password::new()
                .with_prompt("  Bearer token (or ${VAR} placeholder)")
                .interact()
                .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

            let model_url: String = Input::new()
                .with_prompt("  Model URL")
                .default(default_model_url())
                .interact_text()
                .map_err(|e| AgroInsightError::Config(format!("Input error: {}", e)))?;

            insights.backend = BackendKind::HostedInference;
            insights.hosted_inference = Some(HostedInferenceConfig { token, model_url });
        }

        println!();

        let config = Config {
            power: PowerConfig {
                sentinel_policy: if sentinel_choice == 0 {
                    SentinelPolicy::Exclude
                } else {
                    SentinelPolicy::Passthrough
                },
                date_policy: DatePolicy {
                    min_date,
                    max_date,
                    max_span_days: (max_span > 0).then_some(max_span),
                },
                ..defaults
            },
            insights,
        };

        let config_path = match target {
            Some(p) => p,
            None => Self::default_config_path()?,
        };
        let config = Self::save(&config, &config_path)?;

        Ok((config, config_path))
    }

    /// Write `config` to `path`, then read it back through [`Config::parse`]
    /// so a fresh setup gets the same substitution and checks as `load`.
    pub fn save(config: &Config, path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(config)
            .map_err(|e| AgroInsightError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# AgroInsight Configuration\n# Generated by `agroinsight init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, &content)?;

        println!("Configuration saved to {}", path.display());
        println!();

        Self::parse(&content).map_err(|e| {
            AgroInsightError::Config(format!(
                "{} (edit {} or run `agroinsight init` again)",
                e,
                path.display()
            ))
        })
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let Ok(re) = regex_lite::Regex::new(ENV_PLACEHOLDER) else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}
