//! Secrets management for coderev
//!
//! The provider credential is stored separately from configuration to avoid
//! accidental sharing. The secrets file is located at
//! `~/.config/coderev/secrets.toml` and must have restrictive permissions
//! (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variable (GOOGLE_API_KEY)
//! 2. Secrets file (~/.config/coderev/secrets.toml)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Environment variable holding the provider credential
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Secrets {
    /// Google generative language credentials
    pub google: GoogleSecrets,
}

/// Google-related secrets
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoogleSecrets {
    /// Generative language API key
    pub api_key: Option<String>,
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_secrets_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            // Readable by group or others
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        if let Some(ref mut key) = secrets.google.api_key {
            *key = key.trim().to_string();
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/coderev/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("coderev").join("secrets.toml"))
    }

    /// Get the API key with environment variable override
    ///
    /// Priority: GOOGLE_API_KEY env var > secrets file
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_from(&self, env_value: Option<String>) -> Option<String> {
        if let Some(key) = env_value {
            let key = key.trim().to_string();
            if !key.is_empty() {
                debug!("Using API key from {} environment variable", API_KEY_ENV);
                return Some(key);
            }
        }

        match self.google.api_key {
            Some(ref key) if !key.is_empty() => {
                debug!("Using API key from secrets file");
                Some(key.clone())
            }
            _ => None,
        }
    }
}
