//! API client configuration.
//!
//! Loaded from the `[client]` table of the application's TOML config;
//! every field has a default. `SUC_STATUS_API_URL` overrides the base URL.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable overriding [`ClientConfig::api_url`].
pub const API_URL_ENV: &str = "SUC_STATUS_API_URL";

/// Connection settings for the status backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the status API.
    pub api_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Applies environment overrides on top of file/default values.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            log::debug!("Using API URL from {API_URL_ENV}: {url}");
            self.api_url = url;
        }
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parses a standalone `[client]`-shaped TOML document.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::de::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = ClientConfig::from_toml_str("api_url = \"https://suc.example.org\"").unwrap();
        assert_eq!(config.api_url, "https://suc.example.org");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ClientConfig::from_toml_str("").unwrap(), ClientConfig::default());
    }
}
