//! Error types for API transport operations.
//!
//! Every response outside the 2xx range is surfaced as [`Error::Status`]
//! carrying the status code and the raw body, so callers can decide how
//! to present it. Nothing in this crate retries.

use std::fmt;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, DNS, TLS or timeout failures.
    Network,
    /// The server answered with a non-2xx status.
    Status,
    /// Token acquisition failed or was rejected.
    Auth,
    /// The server answered with something we could not decode.
    Format,
    /// Client configuration is incomplete or invalid.
    Config,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Status => "API request rejected",
            Self::Auth => "Authentication failed",
            Self::Format => "Unexpected API response",
            Self::Config => "Invalid client configuration",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check that the appliance host is reachable",
            Self::Status => "Inspect the response body for the server's reason",
            Self::Auth => "Verify the API client id and secret",
            Self::Format => "Check that the appliance API version is supported",
            Self::Config => "Set the host and API credentials",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the configuration API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered outside [200, 300).
    #[error("API returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
    },

    /// The OAuth2 token endpoint refused or returned garbage.
    #[error("authentication failed: {message}")]
    Auth {
        /// Error message.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// The client was configured incorrectly.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Status { status, .. } if *status == 401 => ErrorCategory::Auth,
            Error::Status { .. } => ErrorCategory::Status,
            Error::Http { .. } => ErrorCategory::Network,
            Error::Auth { .. } => ErrorCategory::Auth,
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::Config(_) => ErrorCategory::Config,
        }
    }

    /// The HTTP status, when the server answered at all.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server reported the addressed record as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Status {
                status: code,
                body: String::new(),
            },
            other => Self::Http {
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_category() {
        let err = Error::status(500, "boom");
        assert_eq!(err.category(), ErrorCategory::Status);
        assert_eq!(err.http_status(), Some(500));
    }

    #[test]
    fn test_unauthorized_is_auth() {
        let err = Error::status(401, "");
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[test]
    fn test_not_found() {
        assert!(Error::status(404, "").is_not_found());
        assert!(!Error::status(400, "").is_not_found());
        assert!(
            !Error::Http {
                message: "reset".into()
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_status_display_carries_body() {
        let err = Error::status(422, r#"{"message":"name is required"}"#);
        let display = err.to_string();
        assert!(display.contains("422"));
        assert!(display.contains("name is required"));
    }

    #[test]
    fn test_category_advice() {
        assert!(!ErrorCategory::Network.advice().is_empty());
        assert!(!ErrorCategory::Auth.advice().is_empty());
        assert!(format!("{}", ErrorCategory::Config).contains("configuration"));
    }
}
