//! Error types for the reconciliation engine.
//!
//! Every error a caller can see maps to a [`Diagnostic`]: a category plus a
//! summary and a detail line. Mapping-definition defects are not errors,
//! they panic.

use crate::context::Variant;
use serde::Serialize;
use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of engine errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    /// Non-2xx response or network failure.
    Transport,
    /// Resource type not available under the active product variant.
    Variant,
    /// Config and wire values could not be translated.
    Mapping,
    /// A membership edge failed while reconciling.
    Reconcile,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Transport => "API request failed",
            Self::Variant => "Unsupported product variant",
            Self::Mapping => "Invalid resource data",
            Self::Reconcile => "Membership reconciliation failed",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A labeled error report handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: ErrorCategory,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(
        category: ErrorCategory,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            category,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)
    }
}

/// Errors that can occur during lifecycle and reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport failed or the server rejected the request.
    #[error(transparent)]
    Transport(#[from] srakit::Error),

    /// The resource type is gated to the other product variant.
    #[error("{resource} is not available when the product is {variant}")]
    VariantMismatch {
        /// Resource type name.
        resource: &'static str,
        /// Active variant.
        variant: Variant,
    },

    /// A config identifier is not a decimal integer.
    #[error("invalid id {value:?}: expected an integer")]
    InvalidId {
        /// The offending identifier.
        value: String,
    },

    /// An operation needs an identifier that is null or unknown.
    #[error("{resource} has no id")]
    MissingId {
        /// Resource type name or wire path.
        resource: String,
    },

    /// A request body could not be serialized.
    #[error("failed to encode request to {path}: {message}")]
    Encode {
        /// Request path.
        path: String,
        /// Encoder message.
        message: String,
    },

    /// A response body did not match the wire model.
    #[error("failed to decode response from {path}: {message}")]
    Decode {
        /// Request path.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// A response that must carry a record came back empty.
    #[error("{path} returned no content")]
    EmptyResponse {
        /// Request path.
        path: String,
    },

    /// One membership edge failed; earlier edges stay applied.
    #[error("membership {edge} of {owner}: {source}")]
    Reconcile {
        /// Owning resource id.
        owner: i64,
        /// Edge label.
        edge: String,
        /// What went wrong.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an edge failure with its owner and edge label.
    pub fn reconcile(owner: i64, edge: impl Into<String>, source: Error) -> Self {
        Self::Reconcile {
            owner,
            edge: edge.into(),
            source: Box::new(source),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport(_) | Error::EmptyResponse { .. } => ErrorCategory::Transport,
            Error::VariantMismatch { .. } => ErrorCategory::Variant,
            Error::InvalidId { .. }
            | Error::MissingId { .. }
            | Error::Encode { .. }
            | Error::Decode { .. } => ErrorCategory::Mapping,
            Error::Reconcile { .. } => ErrorCategory::Reconcile,
        }
    }

    /// Build the caller-facing diagnostic for this error.
    #[must_use]
    pub fn diagnostic(&self) -> Diagnostic {
        let summary = match self {
            Error::Transport(inner) => inner.category().description().to_string(),
            Error::Reconcile { owner, .. } => {
                format!("Failed to reconcile memberships of {owner}")
            }
            other => other.category().description().to_string(),
        };
        Diagnostic::new(self.category(), summary, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_category() {
        let err: Error = srakit::Error::status(500, "boom").into();
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(err.diagnostic().detail.contains("500"));
    }

    #[test]
    fn test_variant_mismatch_diagnostic() {
        let err = Error::VariantMismatch {
            resource: "vault_account_group",
            variant: Variant::Rs,
        };
        let diagnostic = err.diagnostic();
        assert_eq!(diagnostic.category, ErrorCategory::Variant);
        assert!(diagnostic.detail.contains("vault_account_group"));
        assert!(diagnostic.detail.contains("rs"));
    }

    #[test]
    fn test_reconcile_diagnostic_names_owner_and_edge() {
        let inner: Error = srakit::Error::status(409, "conflict").into();
        let err = Error::reconcile(12, "group policy 3 (inject)", inner);

        let diagnostic = err.diagnostic();
        assert_eq!(diagnostic.category, ErrorCategory::Reconcile);
        assert!(diagnostic.summary.contains("12"));
        assert!(diagnostic.detail.contains("group policy 3"));
        assert!(diagnostic.detail.contains("409"));
    }

    #[test]
    fn test_mapping_category() {
        let err = Error::InvalidId {
            value: "abc".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Mapping);
        assert!(err.to_string().contains("abc"));
    }
}
