#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `resolute-http` — HTTP Transport Backend
//!
//! A concrete [`transport::Transport`] over [`reqwest::Client`].
//!
//! - Every response the server sends back, whatever its status, resolves to
//!   an [`HttpResponse`]. Deciding that a `401` is a failure is left to the
//!   domain-failure classifier ([`transport::classify`]).
//! - Only exchanges that produced no response (refused connection, timeout,
//!   unreadable body) become a [`TransportError::Http`], tagged with a short
//!   `code` such as `"ECONNREFUSED"` or `"ETIMEDOUT"`.
//!
//! ## Example
//! ```no_run
//! use resolute_http::HttpTransport;
//! use transport::{HttpRequest, Transport};
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let transport = HttpTransport::with_auth("https://api.example.test", "user", "secret");
//! let response = transport.send(HttpRequest::get("/v1/me")).await?;
//! println!("{} {:?}", response.status, response.text());
//! # Ok::<(), transport::TransportError>(())
//! # });
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// A [`Transport`] sending requests with [`reqwest`].
///
/// Request paths are resolved against `base_url`; a path that already is an
/// absolute `http(s)://` url is used as is.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    /// Optional basic authentication credentials `(username, password)`.
    auth: Option<(String, String)>,
}

impl HttpTransport {
    /// Creates an unauthenticated transport for `base_url`.
    ///
    /// ```
    /// use resolute_http::HttpTransport;
    /// use transport::Transport;
    ///
    /// let transport = HttpTransport::new("http://127.0.0.1:8080");
    /// assert_eq!(transport.endpoint(), "http://127.0.0.1:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a transport that sends basic-auth credentials on every request.
    pub fn with_auth(
        base_url: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        let mut transport = Self::new(base_url);
        transport.auth = Some((user.into(), pass.into()));
        transport
    }

    /// Creates a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    /// [`TransportError::Other`] if the client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wraps a preconfigured client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        logging::trace("HTTP", &format!("→ initializing HTTP transport for {}", base_url));
        Self { client, base_url, auth: None }
    }

    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Sends `request` and returns the response, success status or not.
    ///
    /// # Errors
    /// - [`TransportError::Other`] if the method is not a valid HTTP method
    /// - [`TransportError::Http`] if no response could be obtained or its
    ///   body could not be read
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.resolve_url(&request.path);
        logging::trace("HTTP", &format!("→ {} {}", request.method, url));

        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| TransportError::Other(format!("Invalid HTTP method: {}", request.method)))?;

        let mut req = self.client.request(method, &url);
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        if let Some((u, p)) = &self.auth {
            req = req.basic_auth(u, Some(p));
        }

        let resp = req.send().await.map_err(|e| {
            tracing::error!("HTTP Transport - Request failed: {}", e);
            request_error(e, &url, &request.method)
        })?;

        let status = resp.status();
        let final_url = resp.url().to_string();
        let headers: BTreeMap<String, String> = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();

        let body = resp.bytes().await.map_err(|e| {
            tracing::error!("HTTP Transport - Failed to read body: {}", e);
            request_error(e, &final_url, &request.method)
        })?;

        logging::trace("HTTP", &format!("← {} {}", status.as_u16(), final_url));

        let mut response = HttpResponse::new(status.as_u16())
            .with_url(final_url)
            .with_method(request.method)
            .with_body(body.to_vec());
        if let Some(reason) = status.canonical_reason() {
            response = response.with_reason(reason);
        }
        response.headers = headers;
        Ok(response)
    }

    fn endpoint(&self) -> &str { &self.base_url }
}

fn request_error(err: reqwest::Error, url: &str, method: &str) -> TransportError {
    let code = if err.is_timeout() {
        "ETIMEDOUT"
    } else if err.is_connect() {
        "ECONNREFUSED"
    } else if err.is_decode() || err.is_body() {
        "EBODY"
    } else if err.is_redirect() {
        "EREDIRECT"
    } else {
        "EREQUEST"
    };

    TransportError::Http {
        message: err.to_string(),
        code: Some(code.to_string()),
        url: Some(err.url().map(|u| u.to_string()).unwrap_or_else(|| url.to_string())),
        method: Some(method.to_string()),
        status: err.status().map(|s| s.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use transport::classify;

    use super::*;

    /// Serves `response` to the first connection and returns the base url.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = vec![0_u8; 8192];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_new() {
        let url = "http://127.0.0.1:8080";
        let transport = HttpTransport::new(url);
        assert_eq!(transport.base_url, url);
        assert!(transport.auth.is_none());

        let transport = HttpTransport::with_auth(url, "user", "pass");
        let (user, pass) = transport.auth.as_ref().expect("auth should be set");
        assert_eq!((user.as_str(), pass.as_str()), ("user", "pass"));
        assert_eq!(transport.endpoint(), url);
    }

    #[test]
    fn test_resolve_url() {
        let transport = HttpTransport::new("http://localhost:9000/api/");
        assert_eq!(transport.resolve_url("/users/1"), "http://localhost:9000/api/users/1");
        assert_eq!(transport.resolve_url("users"), "http://localhost:9000/api/users");
        assert_eq!(transport.resolve_url(""), "http://localhost:9000/api/");
        assert_eq!(transport.resolve_url("https://other.test/x"), "https://other.test/x");
    }

    #[tokio::test]
    async fn test_send_success() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 9\r\nconnection: close\r\n\r\n{\"id\": 1}",
        )
        .await;

        let response = HttpTransport::new(base)
            .send(HttpRequest::post("/users", json!({"name": "ada"})))
            .await
            .expect("response");

        assert_eq!(response.status, 200);
        assert_eq!(response.method.as_deref(), Some("POST"));
        assert_eq!(response.json(), Some(json!({"id": 1})));
        assert_eq!(response.headers.get("content-type").map(String::as_str), Some("application/json"));
        assert!(classify(&response).is_none());
    }

    #[tokio::test]
    async fn test_failing_status_is_a_response() {
        let base = serve_once(
            "HTTP/1.1 401 Unauthorized\r\ncontent-length: 34\r\nconnection: close\r\n\r\n{\"message\": \"invalid credentials\"}",
        )
        .await;

        let response = HttpTransport::with_auth(base.clone(), "ada", "wrong")
            .send(HttpRequest::get("/login"))
            .await
            .expect("a 401 still resolves");

        assert_eq!(response.status, 401);
        assert_eq!(response.reason.as_deref(), Some("Unauthorized"));
        assert_eq!(response.url.as_deref(), Some(format!("{}/login", base).as_str()));

        let failure = classify(&response).expect("401 is a domain failure");
        assert_eq!(failure.message, "invalid credentials");
        assert_eq!(failure.status, 401);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let err = HttpTransport::new(format!("http://{}", addr))
            .send(HttpRequest::get("/"))
            .await
            .expect_err("nothing is listening");

        assert_eq!(err.code(), Some("ECONNREFUSED"));
        assert_eq!(err.method(), Some("GET"));
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_invalid_method() {
        let err = HttpTransport::new("http://127.0.0.1:1")
            .send(HttpRequest::new("NOT A METHOD", "/"))
            .await
            .expect_err("rejected before sending");
        assert!(matches!(err, TransportError::Other(_)));
    }
}
