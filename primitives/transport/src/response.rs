//! Transport responses and the domain-failure classifier.

use std::collections::BTreeMap;

use serde_json::Value;

/// A completed transport exchange, as seen after the backend is done.
///
/// `body` is `None` when the payload is no longer available, e.g. because
/// a caller already consumed it with [`HttpResponse::take_body`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Reason phrase (`"Not Found"`), if the backend reported one.
    pub reason: Option<String>,
    /// Final url of the exchange.
    pub url: Option<String>,
    /// Method of the request that produced this response.
    pub method: Option<String>,
    /// Response headers, lower-cased names.
    pub headers: BTreeMap<String, String>,
    /// Raw body bytes.
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: None,
            url: None,
            method: None,
            headers: BTreeMap::new(),
            body: Some(Vec::new()),
        }
    }

    /// Sets the reason phrase.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the url.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the request method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Adds a header; the name is stored lower-cased.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// `true` for statuses in `200..=299`.
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }

    /// Body as UTF-8 text, if the body is still present and valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        self.body.as_deref().and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Body parsed as JSON, if possible.
    pub fn json(&self) -> Option<Value> { self.text().and_then(|t| serde_json::from_str(t).ok()) }

    /// Takes the body out of the response, leaving it consumed.
    pub fn take_body(&mut self) -> Option<Vec<u8>> { self.body.take() }

    /// Generic one-line description used when the body has nothing better.
    pub fn status_line(&self) -> String {
        match self.reason.as_deref() {
            Some(reason) if !reason.is_empty() => {
                format!("Request failed with status {} {}", self.status, reason)
            }
            _ => format!("Request failed with status {}", self.status),
        }
    }
}

/// A domain failure synthesized from a non-success [`HttpResponse`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct HttpFailure {
    /// Best-effort human-readable message.
    pub message: String,
    /// Status code of the response.
    pub status: u16,
    /// Reason phrase of the response.
    pub reason: Option<String>,
    /// Url of the response.
    pub url: Option<String>,
    /// Method of the request.
    pub method: Option<String>,
    /// Parsed JSON body, or the raw text as a JSON string.
    pub response_data: Option<Value>,
}

/// Decides whether `response` is a domain failure.
///
/// Returns `None` for successful statuses. Otherwise the message is taken,
/// in order of preference, from a structured `message`/`error` field of a
/// JSON body, from the raw body text, or from the status line. Body
/// inspection problems (consumed body, invalid UTF-8) fall back to the
/// status line; this function never panics.
pub fn classify(response: &HttpResponse) -> Option<HttpFailure> {
    if response.is_success() {
        return None;
    }

    let (message, response_data) = match response.text() {
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed) => {
                let message = structured_message(&parsed)
                    .or_else(|| non_blank(text))
                    .unwrap_or_else(|| response.status_line());
                (message, Some(parsed))
            }
            Err(_) => match non_blank(text) {
                Some(raw) => (raw, Some(Value::String(text.to_string()))),
                None => (response.status_line(), None),
            },
        },
        None => (response.status_line(), None),
    };

    Some(HttpFailure {
        message,
        status: response.status,
        reason: response.reason.clone(),
        url: response.url.clone(),
        method: response.method.clone(),
        response_data,
    })
}

fn structured_message(body: &Value) -> Option<String> {
    let text = |v: Option<&Value>| v.and_then(Value::as_str).and_then(non_blank);

    text(body.get("message"))
        .or_else(|| text(body.get("error")))
        .or_else(|| text(body.get("error").and_then(|e| e.get("message"))))
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
