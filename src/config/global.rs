//! User-wide configuration stored at `~/.pawnpm/config.toml`.
//!
//! ```toml
//! # Clone from a mirror instead of GitHub
//! registry_url = "https://git.example.com"
//!
//! # Give slow links more time per git command
//! git_timeout_secs = 600
//!
//! # Select resources for another platform than the host's
//! platform = "windows"
//! ```
//!
//! Every key is optional. Environment variables take precedence:
//!
//! - `PAWNPM_CONFIG` - path of the configuration file itself
//! - `PAWNPM_REGISTRY_URL` - overrides `registry_url`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{DEFAULT_GIT_TIMEOUT, DEFAULT_REGISTRY_URL};
use crate::core::PawnpmError;
use crate::utils::platform::current_platform;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "PAWNPM_CONFIG";

/// Environment variable overriding the registry base URL.
pub const REGISTRY_URL_ENV: &str = "PAWNPM_REGISTRY_URL";

/// Global configuration shared by every project of the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Base URL repositories are cloned from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,

    /// Timeout in seconds for a single git command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_timeout_secs: Option<u64>,

    /// Platform used to select resources instead of the host platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl GlobalConfig {
    /// Load from `path` if given, otherwise from the default location.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No global config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| PawnpmError::ConfigError {
                message: format!("{}: {}", path.display(), e.message()),
            })
            .with_context(|| format!("Failed to parse global config from {}", path.display()))
    }

    /// Write to a specific file, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize global config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write global config to {}", path.display()))?;

        Ok(())
    }

    /// `$PAWNPM_CONFIG`, or `config.toml` in the user's pawnpm directory.
    ///
    /// - Windows: `%LOCALAPPDATA%\pawnpm\config.toml`
    /// - elsewhere: `~/.pawnpm/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("pawnpm")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".pawnpm")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Effective registry base URL.
    #[must_use]
    pub fn registry_url(&self) -> String {
        std::env::var(REGISTRY_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| self.registry_url.clone())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string())
    }

    /// Effective timeout for one git command.
    #[must_use]
    pub fn git_timeout(&self) -> Duration {
        self.git_timeout_secs.map_or(DEFAULT_GIT_TIMEOUT, Duration::from_secs)
    }

    /// Effective platform for resource selection.
    #[must_use]
    pub fn platform(&self) -> String {
        self.platform.clone().unwrap_or_else(|| current_platform().to_string())
    }
}
