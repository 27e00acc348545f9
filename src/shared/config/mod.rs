//! Client configuration module
//!
//! Describes where the booking API lives. Used by the client auth context to
//! build endpoint URLs.

use thiserror::Error;
use url::Url;

/// Default API server origin
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default API base path
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server origin, e.g. `http://127.0.0.1:5000`
    pub server_url: Url,
    /// Base path every API route is mounted under
    pub api_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid"),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Full URL for an API path such as `/auth/login`
    pub fn endpoint(&self, path: &str) -> String {
        let origin = self.server_url.as_str().trim_end_matches('/');
        format!("{}{}{}", origin, self.api_prefix, path)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    api_prefix: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the API base path
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(prefix.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, AppConfigError> {
        let raw = self
            .server_url
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server_url = Url::parse(&raw).map_err(|_| AppConfigError::InvalidUrl(raw.clone()))?;
        if !matches!(server_url.scheme(), "http" | "https") {
            return Err(AppConfigError::InvalidUrl(raw));
        }

        let mut api_prefix = self
            .api_prefix
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        if api_prefix.is_empty() {
            return Err(AppConfigError::MissingValue("api_prefix"));
        }
        if !api_prefix.starts_with('/') {
            api_prefix.insert(0, '/');
        }
        let api_prefix = api_prefix.trim_end_matches('/').to_string();

        Ok(AppConfig {
            server_url,
            api_prefix,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
