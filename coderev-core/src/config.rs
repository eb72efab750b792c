//! Configuration management for coderev
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (CODEREV_*)
//! 3. Config file (~/.config/coderev/config.toml)
//! 4. Default values
//!
//! The provider credential is not part of this file; see [`crate::secrets`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default Gemini REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Model provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model to request completions from
    pub model: String,

    /// Base URL of the generative language API
    pub endpoint: String,

    /// Client-side timeout for a single completion call
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Sampling temperature (provider default when unset)
    pub temperature: Option<f32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            temperature: None,
        }
    }
}

/// Workflow engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Maximum node executions in a single run
    pub step_limit: u32,

    /// Report the user as satisfied after this many explanations.
    /// When unset the user is never satisfied.
    pub explanation_rounds: Option<u32>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            step_limit: 25,
            explanation_rounds: None,
        }
    }
}

/// HTTP front end configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5050,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Model provider configuration
    pub provider: ProviderConfig,

    /// Workflow configuration
    pub workflow: WorkflowConfig,

    /// Server configuration
    pub server: ServerConfig,
}

/// Overrides supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub step_limit: Option<u32>,
    pub explanation_rounds: Option<u32>,
    pub bind: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/coderev/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("coderev").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - CODEREV_MODEL: Model to use
    /// - CODEREV_ENDPOINT: Provider base URL
    /// - CODEREV_STEP_LIMIT: Maximum workflow steps
    /// - CODEREV_BIND: Address to bind
    /// - CODEREV_PORT: Port to listen on
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(model) = lookup("CODEREV_MODEL") {
            self.provider.model = model;
        }

        if let Some(endpoint) = lookup("CODEREV_ENDPOINT") {
            self.provider.endpoint = endpoint;
        }

        if let Some(limit) = lookup("CODEREV_STEP_LIMIT") {
            self.workflow.step_limit = limit.trim().parse().map_err(|_| {
                Error::Config(format!("CODEREV_STEP_LIMIT must be a number, got '{}'", limit))
            })?;
        }

        if let Some(bind) = lookup("CODEREV_BIND") {
            self.server.bind = bind;
        }

        if let Some(port) = lookup("CODEREV_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                Error::Config(format!("CODEREV_PORT must be a valid port, got '{}'", port))
            })?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(model) = overrides.model {
            self.provider.model = model;
        }

        if let Some(limit) = overrides.step_limit {
            self.workflow.step_limit = limit;
        }

        if let Some(rounds) = overrides.explanation_rounds {
            self.workflow.explanation_rounds = Some(rounds);
        }

        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }

        if let Some(port) = overrides.port {
            self.server.port = port;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults. An explicit `path`
    /// replaces the default config file location and must exist.
    pub fn load_with_overrides(path: Option<&Path>, overrides: CliOverrides) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };

        let config = base.with_env_overrides()?.with_cli_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.workflow.step_limit == 0 {
            return Err(Error::Config(
                "workflow.step_limit must be at least 1".to_string(),
            ));
        }

        url::Url::parse(&self.provider.endpoint).map_err(|e| {
            Error::Config(format!(
                "provider.endpoint '{}' is not a valid URL: {}",
                self.provider.endpoint, e
            ))
        })?;

        Ok(())
    }
}
