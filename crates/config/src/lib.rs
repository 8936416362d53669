//! Configuration loading, validation, and management for RecordPilot.
//!
//! Loads configuration from `~/.recordpilot/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! Everything here is read-only after load: the remote store credentials and
//! the reasoning provider settings are shared by all in-flight requests.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.recordpilot/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the reasoning provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per completion
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Reasoning provider endpoint
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Remote record store connection
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Planner behaviour
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_model() -> String {
    "gemini-flash-latest".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("provider", &self.provider)
            .field("platform", &self.platform)
            .field("agent", &self.agent)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider label used in logs
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_provider_url")]
    pub api_url: String,

    /// Per-call deadline for the completion request
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "gemini".into()
}
fn default_provider_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".into()
}
fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_url: default_provider_url(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Instance used when a request does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_instance: Option<String>,

    /// Basic-auth user name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic-auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Deadline for each outbound HTTP call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Extra attempts for idempotent reads (count, list)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff between read retries; doubles per attempt
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

fn default_request_timeout() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    2
}
fn default_retry_backoff() -> u64 {
    250
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            default_instance: None,
            username: None,
            password: None,
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("default_instance", &self.default_instance)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Deadline for the single planner call
    #[serde(default = "default_planner_timeout")]
    pub planner_timeout_secs: u64,

    /// Upper bound on the assembled conversation context (unbounded if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_chars: Option<usize>,

    /// Ask for a record type before consulting the model when a generic
    /// term like "ticket" has no qualifier
    #[serde(default = "default_true")]
    pub ambiguity_guard: bool,
}

fn default_planner_timeout() -> u64 {
    120
}
fn default_true() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            planner_timeout_secs: default_planner_timeout(),
            max_context_chars: None,
            ambiguity_guard: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.recordpilot/config.toml).
    ///
    /// Environment variables override the file:
    /// - `RECORDPILOT_API_KEY`, `GOOGLE_API_KEY`, `OPENAI_API_KEY` (first set wins)
    /// - `RECORDPILOT_MODEL`
    /// - `RECORDPILOT_INSTANCE`
    /// - `SN_USERNAME`, `SN_PASSWORD`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("RECORDPILOT_API_KEY")
                .or_else(|| lookup("GOOGLE_API_KEY"))
                .or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(model) = lookup("RECORDPILOT_MODEL") {
            self.default_model = model;
        }
        if let Some(instance) = lookup("RECORDPILOT_INSTANCE") {
            self.platform.default_instance = Some(instance);
        }
        if let Some(username) = lookup("SN_USERNAME") {
            self.platform.username = Some(username);
        }
        if let Some(password) = lookup("SN_PASSWORD") {
            self.platform.password = Some(password);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".recordpilot")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.provider.timeout_secs == 0
            || self.platform.request_timeout_secs == 0
            || self.agent.planner_timeout_secs == 0
        {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        if self.agent.max_context_chars == Some(0) {
            return Err(ConfigError::ValidationError(
                "agent.max_context_chars must be greater than zero when set".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check if remote store credentials are available.
    pub fn has_platform_credentials(&self) -> bool {
        self.platform.username.is_some() && self.platform.password.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            provider: ProviderConfig::default(),
            platform: PlatformConfig::default(),
            agent: AgentConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
