//! Configuration management for Vigil services.
//!
//! Configuration is assembled from defaults plus environment variables;
//! file-based configuration belongs to the deployment layer, not this crate.
//!
//! # Environment Variable Mapping
//!
//! - `VIGIL_LOG_LEVEL` → observability.log_level
//! - `VIGIL_LOG_FORMAT` → observability.log_format
//! - `VIGIL_BIND_ADDRESS` → server.bind
//! - `VIGIL_PORT` → server.port
//! - `VIGIL_VALIDATION_ENABLED` → validator.enabled
//! - `VIGIL_VALIDATOR_ENDPOINT` → validator.endpoint
//! - `VIGIL_VALIDATOR_MODEL` → validator.model
//! - `ANTHROPIC_API_KEY` (or `validator.api_key_env`) → validator.api_key

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Configuration Types
// ============================================================================

/// Top-level configuration shared by the Vigil services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging and observability settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,
    /// External validator settings
    #[serde(default)]
    pub validator: ValidatorConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// HTTP service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind: String,
    /// Service port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4436
}

/// External validator configuration.
///
/// The validator is an optional capability: when `enabled` is false the
/// analysis services never attempt a network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Enable LLM validation of keyword-only verdicts
    #[serde(default)]
    pub enabled: bool,
    /// Validator API endpoint
    #[serde(default = "default_validator_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Resolved API key (populated from `api_key_env` at load time)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_validator_model")]
    pub model: String,
    /// Maximum response tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_validator_endpoint(),
            api_key_env: default_api_key_env(),
            api_key: None,
            model: default_validator_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_validator_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_validator_model() -> String {
    "claude-haiku-4-5-20250924".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

// ============================================================================
// Loading
// ============================================================================

impl Config {
    /// Load configuration from defaults plus environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `VIGIL_*` environment overrides on top of the current values.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("VIGIL_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("VIGIL_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Ok(bind) = std::env::var("VIGIL_BIND_ADDRESS") {
            self.server.bind = bind;
        }
        if let Ok(port) = std::env::var("VIGIL_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid VIGIL_PORT value: {port}")))?;
        }
        if let Ok(enabled) = std::env::var("VIGIL_VALIDATION_ENABLED") {
            self.validator.enabled = matches!(enabled.as_str(), "1" | "true" | "yes");
        }
        if let Ok(endpoint) = std::env::var("VIGIL_VALIDATOR_ENDPOINT") {
            self.validator.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("VIGIL_VALIDATOR_MODEL") {
            self.validator.model = model;
        }
        if let Ok(key) = std::env::var(&self.validator.api_key_env) {
            if !key.is_empty() {
                self.validator.api_key = Some(key);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
