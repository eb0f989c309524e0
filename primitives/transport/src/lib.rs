#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `resolute-transport` — Transport Responses and Domain Failures
//!
//! This crate defines the **transport-facing vocabulary** used throughout
//! Resolute.
//!
//! The engine itself never performs I/O: it awaits opaque producers. When a
//! producer happens to be a network call, the value it resolves to is an
//! [`HttpResponse`], and a response with a non-success status is a
//! *domain failure* even though nothing was raised. This crate owns the
//! rule that recognizes such responses.
//!
//! ## Core Concepts
//!
//! ### `HttpResponse`
//! A backend-agnostic snapshot of a completed exchange: status, reason,
//! originating url/method, and the body bytes (if still available).
//!
//! ### `classify`
//! The Domain-Failure Classifier. Inspects a resolved [`HttpResponse`] and,
//! when its status indicates failure, synthesizes an [`HttpFailure`] with
//! a best-effort human message extracted from the body.
//!
//! ### `TransportError`
//! Enumerates failures that happen *before* a response exists (connection
//! refused, body read errors). Carries the request url/method and a short
//! `code` token so that the error normalizer can surface them.
//!
//! ### `Transport` / `DynTransport`
//! The seam that concrete backends (such as `resolute-http`) implement.
//!
//! ## Example
//! ```
//! use transport::{classify, HttpResponse};
//!
//! let response = HttpResponse::new(401)
//!     .with_reason("Unauthorized")
//!     .with_body(r#"{"message":"invalid credentials"}"#);
//!
//! let failure = classify(&response).expect("401 is a domain failure");
//! assert_eq!(failure.message, "invalid credentials");
//! assert_eq!(failure.status, 401);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

mod response;

pub use response::{classify, HttpFailure, HttpResponse};

/// Type alias for structured error handling in transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Canonical error type for all transport implementations.
///
/// Each variant corresponds to a failure that prevented a response from
/// being produced at all. A response that *was* produced but reports a
/// failing status is not a `TransportError`; see [`classify`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TransportError {
    /// The request could not be completed (connection refused, timeout,
    /// invalid url, redirect loop).
    #[error("HTTP transport error: {message}")]
    Http {
        /// Human-readable cause reported by the backend.
        message: String,
        /// Short classification token, e.g. `"ECONNREFUSED"` or `"ETIMEDOUT"`.
        code: Option<String>,
        /// Request url, when known.
        url: Option<String>,
        /// Request method, when known.
        method: Option<String>,
        /// Status code, when the backend had already received one.
        status: Option<u16>,
    },

    /// Any other error not covered by the specific variants above.
    #[error("Other error: {0}")]
    Other(String),
}

impl TransportError {
    /// Status code attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Request url attached to this error, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            TransportError::Http { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    /// Request method attached to this error, if any.
    pub fn method(&self) -> Option<&str> {
        match self {
            TransportError::Http { method, .. } => method.as_deref(),
            _ => None,
        }
    }

    /// Short classification token attached to this error, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            TransportError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// A single outgoing request, independent of the backend that sends it.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method, upper-case (e.g. `"GET"`).
    pub method: String,
    /// Path relative to the transport endpoint, or an absolute url.
    pub path: String,
    /// Extra request headers.
    pub headers: BTreeMap<String, String>,
    /// Optional JSON request body.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Builds a request with the given method and path and no body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self { Self::new("GET", path) }

    /// Shorthand for a `POST` request carrying a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new("POST", path).with_body(body)
    }

    /// Attaches a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// The base transport trait.
///
/// Implementations must resolve to an [`HttpResponse`] for every response
/// they receive, *including* non-success statuses. Only failures that
/// prevent a response from existing are reported as [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a single request and returns the received response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Returns the configured endpoint (base url, socket path, or a
    /// symbolic name for in-memory transports).
    fn endpoint(&self) -> &str;
}

/// Type alias for a shared, dynamically dispatched transport instance.
///
/// ```
/// use transport::{DynTransport, Transport};
///
/// fn use_transport(t: DynTransport) {
///     println!("Using endpoint: {}", t.endpoint());
/// }
/// ```
pub type DynTransport = Arc<dyn Transport>;
