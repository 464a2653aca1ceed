//! Configuration file handling for the CLI.
//!
//! Settings and the session token live in `$XDG_CONFIG_HOME/roster/config.toml`
//! following the XDG Base Directory Specification.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use roster_business::{BusinessConfig, SessionError, TokenStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration stored on disk
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token issued by the directory at login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Directory connection settings. Unset values fall back to the environment, then defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Config {
    /// Get the configuration file path.
    ///
    /// Returns `$XDG_CONFIG_HOME/roster/config.toml` on Linux,
    /// appropriate paths on other platforms.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "roster", "roster")
            .context("Failed to determine config directory")?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Resolve the business configuration.
    ///
    /// Precedence: `api_url` flag, then `ROSTER_*` environment, then this file, then defaults.
    pub fn business_config(&self, api_url: Option<&str>) -> Result<BusinessConfig> {
        let mut config = BusinessConfig::default();
        if let Some(base_url) = &self.api.base_url {
            config.api_base_url.clone_from(base_url);
        }
        if let Some(key) = &self.api.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(page_size) = self.api.page_size {
            config = config.with_page_size(page_size);
        }

        let mut config = config
            .with_env()
            .context("Invalid ROSTER_* environment configuration")?;
        if let Some(url) = api_url {
            url.clone_into(&mut config.api_base_url);
        }
        Ok(config)
    }
}

/// Token slot kept in the `[auth]` table of the config file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn update(&self, token: Option<&str>) -> Result<()> {
        let mut config = Config::load_from(&self.path)?;
        config.auth.token = token.map(str::to_owned);
        config.save_to(&self.path)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Config::load_from(&self.path)
            .map(|config| config.auth.token)
            .map_err(|e| SessionError::Load(format!("{e:#}")))
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        self.update(Some(token))
            .map_err(|e| SessionError::Save(format!("{e:#}")))
    }

    fn clear(&self) -> Result<(), SessionError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(None)
            .map_err(|e| SessionError::Clear(format!("{e:#}")))
    }
}
