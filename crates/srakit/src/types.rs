//! Core types shared by the transports.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Path prefix of the configuration API on the appliance.
pub const API_PREFIX: &str = "/api/config/v1";

/// Path of the OAuth2 token endpoint on the appliance.
pub const TOKEN_PATH: &str = "/oauth2/token";

/// HTTP methods used by the configuration API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Uppercase method name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for an appliance.
#[derive(Clone)]
pub struct ClientConfig {
    /// Appliance host name, optionally with a scheme.
    pub host: String,
    /// API account client id.
    pub client_id: String,
    /// API account client secret.
    pub client_secret: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config with the default timeout.
    pub fn new(
        host: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that every required setting is present.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host is empty".into()));
        }
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(Error::Config("client id and secret are required".into()));
        }
        Ok(())
    }

    /// Scheme and host, without a trailing slash.
    ///
    /// A bare host name gets `https://`.
    #[must_use]
    pub fn origin(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    /// Base URL every resource path is appended to.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}{}", self.origin(), API_PREFIX)
    }

    /// Full URL of the token endpoint.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}{}", self.origin(), TOKEN_PATH)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Body of a successful token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_adds_scheme() {
        let config = ClientConfig::new("example.beyondtrustcloud.com", "id", "secret");
        assert_eq!(config.origin(), "https://example.beyondtrustcloud.com");
        assert_eq!(
            config.api_base(),
            "https://example.beyondtrustcloud.com/api/config/v1"
        );
        assert_eq!(
            config.token_url(),
            "https://example.beyondtrustcloud.com/oauth2/token"
        );
    }

    #[test]
    fn test_origin_keeps_scheme() {
        let config = ClientConfig::new("http://localhost:8080/", "id", "secret");
        assert_eq!(config.origin(), "http://localhost:8080");
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::new("host", "id", "secret").validate().is_ok());
        assert!(ClientConfig::new(" ", "id", "secret").validate().is_err());
        assert!(ClientConfig::new("host", "", "secret").validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::new("host", "id", "hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_token_response_defaults() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, 3600);
    }
}
