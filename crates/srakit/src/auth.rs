//! OAuth2 client-credentials token handling.
//!
//! The appliance issues short-lived bearer tokens. [`TokenCache`] keeps the
//! current one and refreshes it shortly before it expires.

use crate::error::{Error, Result};
use crate::types::{ClientConfig, TokenResponse};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Tokens are refreshed this long before the server would reject them.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Thread-safe holder for the current bearer token.
#[derive(Debug, Default)]
pub struct TokenCache {
    current: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a valid token, calling `fetch` when none is cached or the
    /// cached one is about to expire.
    ///
    /// The lock is held across `fetch` so concurrent callers share one
    /// refresh.
    pub fn get_or_refresh<F>(&self, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Result<TokenResponse>,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = current.as_ref()
            && token.expires_at > Instant::now() + EXPIRY_MARGIN
        {
            return Ok(token.value.clone());
        }

        log::debug!("Requesting new API access token");
        let response = fetch()?;
        if response.access_token.is_empty() {
            return Err(Error::Auth {
                message: "token endpoint returned an empty access token".into(),
            });
        }

        let token = CachedToken {
            value: response.access_token,
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        };
        let value = token.value.clone();
        *current = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next request fetches a fresh one.
    pub fn invalidate(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// `Authorization` header value for the token endpoint.
#[must_use]
pub fn basic_credentials(config: &ClientConfig) -> String {
    let raw = format!("{}:{}", config.client_id, config.client_secret);
    format!("Basic {}", STANDARD.encode(raw))
}
