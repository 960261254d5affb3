//! Environment configuration for the provider and consumer programs.
//!
//! Settings are read once at startup and validated before anything runs.
//! Every loader has a `from_lookup` form taking the variable source as a
//! closure, which is what `from_env` delegates to.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OPENAI_API_KEY` | required |
//! | `OPENAI_MODEL` | `gpt-4o` |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `OPENAI_MAX_TOKENS` | `1000` |
//! | `OPENAI_TEMPERATURE` | `0.7` |
//! | `WEATHER_AGENT_HOST` | `0.0.0.0` |
//! | `WEATHER_AGENT_PORT` | `9999` |
//! | `WEATHER_AGENT_PUBLIC_URL` | `http://localhost:{port}/` |
//! | `WEATHER_AGENT_URL` | `http://127.0.0.1:9999/` |
//! | `WEATHER_AGENT_TIMEOUT_SECS` | `300` |

use std::env;
use std::time::Duration;
use url::Url;
use weather_relay_llm::{ApiKey, OpenAiConfig};

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9999;
pub const DEFAULT_WEATHER_AGENT_URL: &str = "http://127.0.0.1:9999/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// OpenAI connection and sampling settings
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: ApiKey,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmSettings {
    /// Settings with defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            model: DEFAULT_MODEL.to_string(),
            base_url: weather_relay_llm::openai::DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let mut settings = Self::new(api_key);
        if let Some(model) = lookup("OPENAI_MODEL") {
            settings.model = model;
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            settings.base_url = base_url;
        }
        if let Some(max_tokens) = parse_var::<u32, _>(&lookup, "OPENAI_MAX_TOKENS")? {
            settings.max_tokens = max_tokens;
        }
        if let Some(temperature) = parse_var::<f32, _>(&lookup, "OPENAI_TEMPERATURE")? {
            settings.temperature = temperature;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_blank() {
            return Err(ConfigError::ValidationError(
                "OPENAI_API_KEY must not be empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model must not be empty".to_string(),
            ));
        }
        validate_url("OPENAI_BASE_URL", &self.base_url)?;
        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Provider settings for [`OpenAiProvider`](weather_relay_llm::OpenAiProvider)
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Settings for serving the weather agent
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub llm: LlmSettings,
    pub host: String,
    pub port: u16,
    /// URL advertised in the agent card; derived from the port when unset
    pub public_url: Option<String>,
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            llm: LlmSettings::from_lookup(&lookup)?,
            host: lookup("WEATHER_AGENT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "WEATHER_AGENT_PORT")?.unwrap_or(DEFAULT_PORT),
            public_url: lookup("WEATHER_AGENT_PUBLIC_URL"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = Some(public_url.into());
        self
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL advertised in the agent card
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}/", self.port))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.llm.validate()?;
        if self.host.is_empty() || self.host.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(ConfigError::InvalidEnvVar {
                key: "WEATHER_AGENT_HOST".to_string(),
                message: format!("invalid bind address '{}'", self.bind_addr()),
            });
        }
        validate_url("WEATHER_AGENT_PUBLIC_URL", &self.public_url())
    }
}

/// Where the remote weather agent lives and how long to wait for it
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteAgentSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteAgentSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_AGENT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteAgentSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(base_url) = lookup("WEATHER_AGENT_URL") {
            settings.base_url = base_url;
        }
        if let Some(timeout) = parse_var(&lookup, "WEATHER_AGENT_TIMEOUT_SECS")? {
            settings.timeout_secs = timeout;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("WEATHER_AGENT_URL", &self.base_url)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "WEATHER_AGENT_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the orchestrating consumer
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub llm: LlmSettings,
    pub remote: RemoteAgentSettings,
}

impl ConsumerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            llm: LlmSettings::from_lookup(&lookup)?,
            remote: RemoteAgentSettings::from_lookup(&lookup)?,
        })
    }
}

// Environment variable helpers

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Lookup that answers from `overrides` first and falls back to `lookup`.
///
/// Command-line flags go through here so that they replace the environment
/// value before parsing and validation.
pub fn with_overrides<F>(
    overrides: Vec<(&'static str, String)>,
    lookup: F,
) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    move |key: &str| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
            .or_else(|| lookup(key))
    }
}

/// [`with_overrides`] on top of the process environment
pub fn env_with_overrides(
    overrides: Vec<(&'static str, String)>,
) -> impl Fn(&str) -> Option<String> {
    with_overrides(overrides, env_lookup)
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar {
        key: key.to_string(),
        message: format!("invalid URL '{value}': {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidEnvVar {
            key: key.to_string(),
            message: format!("unsupported scheme '{scheme}', expected http or https"),
        }),
    }
}
