use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVariable(String),
    #[error("Invalid value for environment variable {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Process-wide settings, loaded once at startup and shared read-only.
#[derive(Clone)]
pub struct AnalyzerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_upload_mb: usize,
    pub summary_max_tokens: u32,
    pub questions_max_tokens: u32,
    pub temperature: f32,
    pub max_input_chars: usize,
    pub provider_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_upload_mb", &self.max_upload_mb)
            .field("summary_max_tokens", &self.summary_max_tokens)
            .field("questions_max_tokens", &self.questions_max_tokens)
            .field("temperature", &self.temperature)
            .field("max_input_chars", &self.max_input_chars)
            .field("provider_timeout", &self.provider_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("OPENAI_API_KEY")
            .ok_or_else(|| ConfigError::MissingVariable("OPENAI_API_KEY".to_string()))?;

        let max_upload_mb: usize = parse_or(&get, "MAX_FILE_SIZE_MB", 10)?;
        if max_upload_mb == 0 {
            return Err(invalid("MAX_FILE_SIZE_MB", "0"));
        }

        let temperature: f32 = parse_or(&get, "TEMPERATURE", 0.7)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid("TEMPERATURE", &temperature.to_string()));
        }

        let timeout_secs: u64 = parse_or(&get, "PROVIDER_TIMEOUT_SECS", 60)?;
        if timeout_secs == 0 {
            return Err(invalid("PROVIDER_TIMEOUT_SECS", "0"));
        }

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_upload_mb,
            summary_max_tokens: parse_or(&get, "SUMMARY_MAX_TOKENS", 1500)?,
            questions_max_tokens: parse_or(&get, "QUESTIONS_MAX_TOKENS", 1000)?,
            temperature,
            max_input_chars: parse_or(&get, "MAX_INPUT_CHARS", 16000)?,
            provider_timeout: Duration::from_secs(timeout_secs),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 8000)?,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, &raw)),
        None => Ok(default),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
