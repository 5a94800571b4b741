//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use siteverify_types::{PolicyOptions, ProtocolVersion, VERIFY_ENDPOINT};

use crate::ConfigError;

/// Configuration for a [`VerifyEngine`](crate::VerifyEngine).
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Service credential. Required.
    #[serde(default)]
    pub secret: String,

    /// Response shape the service answers with: "v2" or "v3".
    #[serde(default)]
    pub version: ProtocolVersion,

    /// Overall request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verification endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Acceptance policy applied when the caller supplies none.
    #[serde(default)]
    pub policy: PolicyOptions,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_timeout_secs() -> u64 {
    10
}

fn default_endpoint() -> String {
    VERIFY_ENDPOINT.to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Config(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            version: ProtocolVersion::default(),
            timeout_secs: default_timeout_secs(),
            endpoint: default_endpoint(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            policy: PolicyOptions::default(),
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("secret", &"<redacted>")
            .field("version", &self.version)
            .field("timeout_secs", &self.timeout_secs)
            .field("endpoint", &self.endpoint)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .field("policy", &self.policy)
            .finish()
    }
}
