//! # srakit
//!
//! Blocking client plumbing for the remote access appliance's REST
//! configuration API.
//!
//! This crate provides:
//! - The [`Transport`] capability: one authenticated request in, body bytes out
//! - [`HttpTransport`]: `ureq` over HTTPS with OAuth2 client-credentials tokens
//! - [`MockTransport`]: canned responses and request recording for tests
//!
//! Responses outside [200, 300) become [`Error::Status`] with the raw body.
//! A 2xx with an empty body is `Ok(None)`.
//!
//! ## Example
//!
//! ```no_run
//! use srakit::{ClientConfig, HttpTransport, Method, Transport};
//!
//! let config = ClientConfig::new("example.beyondtrustcloud.com", "client-id", "secret");
//! let transport = HttpTransport::new(config).expect("invalid config");
//!
//! let query = vec![("name".to_string(), "ops".to_string())];
//! if let Some(body) = transport.do_request(Method::Get, "/jump-group", &query, None).unwrap() {
//!     println!("{}", String::from_utf8_lossy(&body));
//! }
//! ```

#![warn(clippy::all)]

pub mod auth;
pub mod error;
pub mod transport;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use transport::http::HttpTransport;
pub use transport::{MockTransport, RecordedRequest, Transport};
pub use types::{ClientConfig, Method};
