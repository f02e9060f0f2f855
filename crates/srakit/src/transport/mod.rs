//! Transport trait and implementations.
//!
//! [`Transport`] is the single capability the reconciliation engine needs
//! from the network: send one authenticated request, get the body back.
//! The production implementation is [`http::HttpTransport`].
//!
//! # Testing
//!
//! Use [`MockTransport`] to run everything above the transport without a
//! network:
//!
//! ```
//! use srakit::{Method, MockTransport, Transport};
//!
//! let mock = MockTransport::new();
//! mock.respond(Method::Get, "/jump-group/7", &serde_json::json!({"id": 7, "name": "ops"}));
//!
//! let body = mock.do_request(Method::Get, "/jump-group/7", &[], None).unwrap();
//! assert!(body.is_some());
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::Method;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Sends authenticated requests to the configuration API.
pub trait Transport: Send + Sync {
    /// Perform one request.
    ///
    /// `path` is relative to the API base and starts with `/`. `query`
    /// pairs are appended URL-encoded. Returns `Ok(None)` when the server
    /// answered 2xx with an empty body.
    ///
    /// # Errors
    ///
    /// Returns `Error::Status` for any status outside [200, 300).
    fn do_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&[u8]>,
    ) -> Result<Option<Vec<u8>>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn do_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&[u8]>,
    ) -> Result<Option<Vec<u8>>> {
        (**self).do_request(method, path, query, body)
    }
}

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Empty,
    Fail { status: u16, body: String },
}

#[derive(Debug, Default)]
struct MockState {
    canned: HashMap<(Method, String), Canned>,
    requests: Vec<RecordedRequest>,
}

/// In-memory transport for tests.
///
/// Responses are keyed by method and path. Unconfigured `GET`s answer
/// 404; unconfigured writes answer 204.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a new empty mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer `method path` with the JSON encoding of `body`.
    pub fn respond(&self, method: Method, path: &str, body: &impl Serialize) {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        self.state()
            .canned
            .insert((method, path.to_string()), Canned::Body(bytes));
    }

    /// Answer `method path` with 204 No Content.
    pub fn respond_empty(&self, method: Method, path: &str) {
        self.state()
            .canned
            .insert((method, path.to_string()), Canned::Empty);
    }

    /// Answer `method path` with an error status.
    pub fn fail(&self, method: Method, path: &str, status: u16, body: &str) {
        self.state().canned.insert(
            (method, path.to_string()),
            Canned::Fail {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// Requests received for one method, in order.
    #[must_use]
    pub fn requests_for(&self, method: Method) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    /// Forget recorded requests, keeping canned responses.
    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }
}

impl Transport for MockTransport {
    fn do_request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&[u8]>,
    ) -> Result<Option<Vec<u8>>> {
        let mut state = self.state();
        state.requests.push(RecordedRequest {
            method,
            path: path.to_string(),
            query: query.to_vec(),
            body: body.and_then(|b| serde_json::from_slice(b).ok()),
        });

        match state.canned.get(&(method, path.to_string())) {
            Some(Canned::Body(bytes)) => Ok(Some(bytes.clone())),
            Some(Canned::Empty) => Ok(None),
            Some(Canned::Fail { status, body }) => Err(Error::status(*status, body.clone())),
            None if method == Method::Get => Err(Error::status(404, "not found")),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_unconfigured_get_is_404() {
        let mock = MockTransport::new();
        let err = mock
            .do_request(Method::Get, "/jump-group/1", &[], None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_mock_unconfigured_write_is_empty() {
        let mock = MockTransport::new();
        let body = mock
            .do_request(Method::Delete, "/jump-group/1", &[], None)
            .unwrap();
        assert!(body.is_none());
    }

    #[test]
    fn test_mock_canned_body() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/jumpoint", &json!([{"id": 1}]));

        let body = mock
            .do_request(Method::Get, "/jumpoint", &[], None)
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!([{"id": 1}]));
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockTransport::new();
        mock.fail(Method::Post, "/jump-group", 422, "name taken");

        let err = mock
            .do_request(Method::Post, "/jump-group", &[], Some(b"{}"))
            .unwrap_err();
        assert_eq!(err.http_status(), Some(422));
    }

    #[test]
    fn test_mock_records_requests() {
        let mock = MockTransport::new();
        let query = vec![("name".to_string(), "ops".to_string())];
        let _ = mock.do_request(Method::Get, "/jump-group", &query, None);
        let _ = mock.do_request(Method::Post, "/jump-group", &[], Some(br#"{"name":"ops"}"#));

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query, query);
        assert_eq!(requests[1].body, Some(json!({"name": "ops"})));
        assert_eq!(mock.requests_for(Method::Post).len(), 1);

        mock.clear_requests();
        assert!(mock.requests().is_empty());
    }
}
