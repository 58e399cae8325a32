//! Configuration management for Titler
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Everything is resolved once at startup; the title orchestrator only ever
//! sees the resulting [`TitleConfig`].

use crate::error::{Result, TitlerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Titler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration
    pub provider: ProviderConfig,
    /// Title generation behavior
    #[serde(default)]
    pub title: TitleConfig,
    /// Conversation storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Provider configuration
///
/// Specifies which client produces titles and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use ("ollama" or "none")
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Per-client options
    #[serde(default)]
    pub options: ClientOptions,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Options attached to a single client instance
///
/// `title_convo` can only switch titling off: `None` and `Some(true)` both
/// defer to the global flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Explicit per-client title generation switch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_convo: Option<bool>,
}

impl ClientOptions {
    /// Whether this client has title generation explicitly disabled
    pub fn title_disabled(&self) -> bool {
        self.title_convo == Some(false)
    }
}

/// Title generation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleConfig {
    /// Global title generation switch (`TITLE_CONVO`)
    #[serde(default = "default_title_enabled")]
    pub enabled: bool,

    /// Deadline for a single generation attempt (milliseconds)
    #[serde(default = "default_title_timeout_ms")]
    pub timeout_ms: u64,

    /// Lifetime of a cached title (milliseconds)
    #[serde(default = "default_title_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
}

fn default_title_enabled() -> bool {
    true
}

fn default_title_timeout_ms() -> u64 {
    45_000
}

fn default_title_cache_ttl_ms() -> u64 {
    120_000
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            enabled: default_title_enabled(),
            timeout_ms: default_title_timeout_ms(),
            cache_ttl_ms: default_title_cache_ttl_ms(),
        }
    }
}

impl TitleConfig {
    /// Generation deadline as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache lifetime as a `Duration`
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

/// Conversation storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit SQLite database path; defaults to the user data directory
    #[serde(default)]
    pub path: Option<String>,
}

/// Interpret a boolean-like flag value
///
/// Only the string `true` (any case, surrounding whitespace ignored) enables
/// a flag; every other value disables it.
///
/// # Examples
///
/// ```
/// use titler::config::is_enabled;
///
/// assert!(is_enabled("true"));
/// assert!(is_enabled(" TRUE "));
/// assert!(!is_enabled("1"));
/// assert!(!is_enabled("false"));
/// ```
pub fn is_enabled(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "ollama".to_string(),
                ollama: OllamaConfig::default(),
                options: ClientOptions::default(),
            },
            title: TitleConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TitlerError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| TitlerError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(flag) = std::env::var("TITLE_CONVO") {
            self.title.enabled = is_enabled(&flag);
            tracing::debug!(enabled = self.title.enabled, "Env override: TITLE_CONVO");
        }

        if let Ok(provider_type) = std::env::var("TITLER_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(ollama_host) = std::env::var("TITLER_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("TITLER_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(client_flag) = std::env::var("TITLER_CLIENT_TITLE_CONVO") {
            self.provider.options.title_convo = Some(is_enabled(&client_flag));
        }

        if let Ok(timeout) = std::env::var("TITLER_TITLE_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse() {
                self.title.timeout_ms = value;
            } else {
                tracing::warn!("Invalid TITLER_TITLE_TIMEOUT_MS: {}", timeout);
            }
        }

        if let Ok(ttl) = std::env::var("TITLER_TITLE_CACHE_TTL_MS") {
            if let Ok(value) = ttl.parse() {
                self.title.cache_ttl_ms = value;
            } else {
                tracing::warn!("Invalid TITLER_TITLE_CACHE_TTL_MS: {}", ttl);
            }
        }

        if let Ok(db_path) = std::env::var("TITLER_HISTORY_DB") {
            self.storage.path = Some(db_path);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(db_path) = &cli.storage_path {
            self.storage.path = Some(db_path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(TitlerError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["ollama", "none"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(TitlerError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.title.timeout_ms == 0 {
            return Err(
                TitlerError::Config("title.timeout_ms must be greater than 0".to_string()).into(),
            );
        }

        if self.title.cache_ttl_ms == 0 {
            return Err(TitlerError::Config(
                "title.cache_ttl_ms must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
