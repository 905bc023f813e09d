// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the engine client.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, SdkError};
use crate::types::ApiVersion;

/// Configuration for the DelphixClient.
#[derive(Clone)]
pub struct SdkConfig {
    /// Base URL of the engine, e.g. `http://engine.example.com`.
    pub url: String,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// API version announced when the session is opened.
    pub api_version: ApiVersion,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            username: "delphix_admin".to_string(),
            password: String::new(),
            api_version: ApiVersion::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl SdkConfig {
    /// Create a configuration for the given engine and credentials.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DELPHIX_URL`: Engine base URL (required)
    /// - `DELPHIX_USERNAME`: Login user (required)
    /// - `DELPHIX_PASSWORD`: Login password (required)
    /// - `DELPHIX_API_VERSION`: `major.minor.micro` (default: "1.10.0")
    /// - `DELPHIX_CONNECT_TIMEOUT_MS`: Connection timeout in milliseconds (default: 10000)
    /// - `DELPHIX_REQUEST_TIMEOUT_MS`: Request timeout in milliseconds (default: 30000)
    pub fn from_env() -> Result<Self> {
        let url = required_var("DELPHIX_URL")?;
        let username = required_var("DELPHIX_USERNAME")?;
        let password = required_var("DELPHIX_PASSWORD")?;

        let api_version: ApiVersion = std::env::var("DELPHIX_API_VERSION")
            .unwrap_or_else(|_| ApiVersion::default().to_string())
            .parse()?;

        let connect_timeout_ms: u64 = std::env::var("DELPHIX_CONNECT_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid DELPHIX_CONNECT_TIMEOUT_MS: {}", e)))?;

        let request_timeout_ms: u64 = std::env::var("DELPHIX_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid DELPHIX_REQUEST_TIMEOUT_MS: {}", e)))?;

        Ok(Self {
            url,
            username,
            password,
            api_version,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            request_timeout: Duration::from_millis(request_timeout_ms),
        })
    }

    /// Set the engine URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check that the configuration can be used to open a session.
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(SdkError::Config(format!(
                "url must start with http:// or https://, got {:?}",
                self.url
            )));
        }
        if self.username.is_empty() {
            return Err(SdkError::Config("username must not be empty".to_string()));
        }
        Ok(())
    }
}

fn required_var(name: &'static str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| SdkError::Config(format!("missing required environment variable: {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SdkConfig::default();
        assert_eq!(config.url, "http://localhost");
        assert_eq!(config.api_version, ApiVersion::new(1, 10, 0));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_methods() {
        let config = SdkConfig::new("http://engine", "admin", "secret")
            .with_url("https://engine.example.com")
            .with_api_version(ApiVersion::new(1, 9, 3))
            .with_connect_timeout(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(60));

        assert_eq!(config.url, "https://engine.example.com");
        assert_eq!(config.username, "admin");
        assert_eq!(config.api_version, ApiVersion::new(1, 9, 3));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = SdkConfig::new("http://engine", "admin", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_validate() {
        assert!(SdkConfig::new("http://engine", "admin", "x").validate().is_ok());
        assert!(matches!(
            SdkConfig::new("engine", "admin", "x").validate(),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(
            SdkConfig::new("http://engine", "", "x").validate(),
            Err(SdkError::Config(_))
        ));
    }
}
