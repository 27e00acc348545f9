use std::time::Duration;

use crate::shared::config::{AppConfig, AppConfigBuilder, AppConfigError};

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the client auth context finds the booking API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    app: AppConfig,
    timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read `CLIENT_API_URL` and `CLIENT_API_PREFIX`, falling back to defaults
    pub fn from_env() -> Result<Self, AppConfigError> {
        let mut builder = AppConfig::builder();
        if let Ok(url) = std::env::var("CLIENT_API_URL") {
            builder = builder.server_url(url);
        }
        if let Ok(prefix) = std::env::var("CLIENT_API_PREFIX") {
            builder = builder.api_prefix(prefix);
        }
        Self::with_builder(builder)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, AppConfigError> {
        Ok(Self {
            app: builder.build()?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        self.app.endpoint(path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_str()
    }
}
