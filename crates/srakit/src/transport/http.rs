//! Bearer-token HTTP transport.
//!
//! This module provides [`HttpTransport`], the production [`Transport`]
//! over a blocking `ureq` agent. Tokens come from the appliance's OAuth2
//! client-credentials endpoint and are cached by [`TokenCache`].

use crate::auth::{TokenCache, basic_credentials};
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{ClientConfig, Method, TokenResponse};
use ureq::Body;
use ureq::http::Response;

/// HTTP transport authenticated with OAuth2 client credentials.
///
/// # Example
///
/// ```no_run
/// use srakit::{ClientConfig, HttpTransport, Method, Transport};
///
/// let config = ClientConfig::new("example.beyondtrustcloud.com", "id", "secret");
/// let transport = HttpTransport::new(config).unwrap();
/// let body = transport.do_request(Method::Get, "/jump-group", &[], None).unwrap();
/// ```
pub struct HttpTransport {
    agent: ureq::Agent,
    config: ClientConfig,
    api_base: String,
    tokens: TokenCache,
}

impl HttpTransport {
    /// Create a transport for the given appliance.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        // Status codes are classified here, not by the agent, so error
        // bodies can be captured.
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .into();

        Ok(Self {
            agent,
            api_base: config.api_base(),
            config,
            tokens: TokenCache::new(),
        })
    }

    /// Get the API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn fetch_token(&self) -> Result<TokenResponse> {
        let url = self.config.token_url();
        let authorization = basic_credentials(&self.config);

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", authorization.as_str())
            .header("Accept", "application/json")
            .send_form([("grant_type", "client_credentials")])
            .map_err(|e| Error::Auth {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_vec().map_err(|e| Error::Auth {
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(Error::Auth {
                message: format!("HTTP {status}: {}", String::from_utf8_lossy(&body)),
            });
        }

        serde_json::from_slice(&body).map_err(|e| Error::Auth {
            message: format!("invalid token response: {e}"),
        })
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        body: Option<&[u8]>,
        bearer: &str,
    ) -> Result<Response<Body>> {
        let response = match method {
            Method::Get => {
                let mut request = self.agent.get(url);
                for (key, value) in query {
                    request = request.query(key, value);
                }
                request
                    .header("Authorization", bearer)
                    .header("Accept", "application/json")
                    .call()?
            }
            Method::Delete => self
                .agent
                .delete(url)
                .header("Authorization", bearer)
                .header("Accept", "application/json")
                .call()?,
            Method::Post | Method::Patch => {
                let request = if method == Method::Post {
                    self.agent.post(url)
                } else {
                    self.agent.patch(url)
                };
                let request = request
                    .header("Authorization", bearer)
                    .header("Accept", "application/json")
                    .header("Content-Type", "application/json");
                match body {
                    Some(bytes) => request.send(bytes)?,
                    None => request.send_empty()?,
                }
            }
        };
        Ok(response)
    }
}

impl Transport for HttpTransport {
    fn do_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&[u8]>,
    ) -> Result<Option<Vec<u8>>> {
        let token = self.tokens.get_or_refresh(|| self.fetch_token())?;
        let bearer = format!("Bearer {token}");
        let url = self.url(path);

        let mut response = self.send(method, &url, query, body, &bearer)?;
        let status = response.status().as_u16();
        log::trace!("{method} {path} -> {status}");

        let bytes = response.body_mut().read_to_vec()?;

        if status == 401 {
            // Next call starts from a fresh token; this one still fails.
            self.tokens.invalidate();
        }
        if !(200..300).contains(&status) {
            return Err(Error::status(
                status,
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }

        if bytes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(bytes))
        }
    }
}
