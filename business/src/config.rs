//! Where the directory lives and how pages are sized.
//!
//! [`BusinessConfig`] is built by the front end, then overlaid with `ROSTER_*`
//! environment variables through [`BusinessConfig::with_env`].

use serde::Deserialize;
use std::env::vars;

/// Default directory service (the public reqres sandbox).
pub const DEFAULT_API_BASE_URL: &str = "https://reqres.in/api";

/// Rows per page until the user picks another size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read environment configuration: {0}")]
    Env(String),
    #[error("Page size must be at least 1")]
    InvalidPageSize,
}

/// Settings shared by every component of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Root of the directory API, e.g. `https://reqres.in/api`.
    pub api_base_url: String,
    /// Optional key sent as `x-api-key` on every request.
    pub api_key: Option<String>,
    /// Rows requested per page, at least 1.
    pub page_size: u32,
}

/// Environment overlay, read with `serde_env`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    roster_api_base_url: Option<String>,
    roster_api_key: Option<String>,
    roster_page_size: Option<u32>,
}

impl BusinessConfig {
    /// Defaults pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `ROSTER_API_BASE_URL`, `ROSTER_API_KEY` and `ROSTER_PAGE_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Overlay the `ROSTER_*` environment variables on top of `self`.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_env::from_iter(vars()).map_err(|e| ConfigError::Env(e.to_string()))?;
        self.overlay(raw)
    }

    fn overlay(mut self, raw: RawConfig) -> Result<Self, ConfigError> {
        if let Some(url) = raw.roster_api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(key) = raw.roster_api_key.filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(size) = raw.roster_page_size {
            if size == 0 {
                return Err(ConfigError::InvalidPageSize);
            }
            self.page_size = size;
        }
        Ok(self)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Zero is raised to 1.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// `POST` target for credentials.
    pub fn login_url(&self) -> String {
        format!("{}/login", self.base())
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base())
    }

    /// A single user, for `PUT` and `DELETE`.
    pub fn user_url(&self, id: u64) -> String {
        format!("{}/users/{id}", self.base())
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
