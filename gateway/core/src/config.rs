//! TOML Configuration File Support
//!
//! Centralized configuration loading for the gateway, supporting a TOML
//! configuration file at `~/.config/counsel/gateway.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest
//! first):
//! 1. CLI arguments (applied by the caller via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1:3000"
//!
//! [backend]
//! url = "http://127.0.0.1:8000"
//! request_timeout_secs = 120
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::http::{DEFAULT_BACKEND_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Default address the gateway binds its HTTP listener on.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Server section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerToml {
    /// Address to bind the HTTP listener on
    pub bind_addr: Option<String>,
}

/// Backend section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendToml {
    /// Base URL of the retrieval backend
    pub url: Option<String>,

    /// Per-request timeout towards the backend in seconds (0 = unbounded)
    pub request_timeout_secs: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayToml {
    /// Server configuration section
    pub server: ServerToml,

    /// Backend configuration section
    pub backend: BackendToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Centralized configuration for the gateway
///
/// This struct consolidates all configuration from multiple sources and
/// tracks where the values came from. Use [`load_config`] to load
/// configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Address the HTTP listener binds on
    pub bind_addr: String,

    /// Base URL of the retrieval backend
    pub backend_url: String,

    /// Per-request timeout towards the backend in seconds (0 = unbounded)
    pub request_timeout_secs: u64,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/counsel/gateway.toml` or
/// `~/.config/counsel/gateway.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("counsel").join("gateway.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<GatewayConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only
///   defaults and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<GatewayConfig, ConfigError> {
    // Start with defaults
    let mut config = GatewayConfig::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: GatewayToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut GatewayConfig, toml: &GatewayToml) {
    if let Some(ref bind_addr) = toml.server.bind_addr {
        config.bind_addr = bind_addr.clone();
    }
    if let Some(ref url) = toml.backend.url {
        config.backend_url = url.clone();
    }
    if let Some(timeout) = toml.backend.request_timeout_secs {
        config.request_timeout_secs = timeout;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut GatewayConfig) {
    if let Ok(bind_addr) = std::env::var("GATEWAY_BIND") {
        config.bind_addr = bind_addr;
        config.source = ConfigSource::Env;
    }
    if let Ok(url) = std::env::var("BACKEND_URL") {
        config.backend_url = url;
        config.source = ConfigSource::Env;
    }
    if let Ok(timeout) = std::env::var("GATEWAY_REQUEST_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.request_timeout_secs = secs;
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Bind address override
    pub bind_addr: Option<String>,

    /// Backend URL override
    pub backend_url: Option<String>,

    /// Request timeout override (seconds)
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bind address override
    #[must_use]
    pub fn with_bind_addr(mut self, bind_addr: String) -> Self {
        self.bind_addr = Some(bind_addr);
        self
    }

    /// Set backend URL override
    #[must_use]
    pub fn with_backend_url(mut self, url: String) -> Self {
        self.backend_url = Some(url);
        self
    }

    /// Set request timeout override
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut GatewayConfig) {
        if self.bind_addr.is_some()
            || self.backend_url.is_some()
            || self.request_timeout_secs.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr.clone();
        }

        if let Some(ref url) = self.backend_url {
            config.backend_url = url.clone();
        }

        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
