//! Integration tests for the shared transport API.
//!
//! These exercise consumer usage patterns with an in-memory transport, so
//! no network is needed.

use transport::{classify, HttpRequest, HttpResponse, Transport, TransportError};

struct DummyTransport;

#[async_trait::async_trait]
impl transport::Transport for DummyTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        match request.path.as_str() {
            "/down" => Err(TransportError::Http {
                message: "connection refused".to_string(),
                code: Some("ECONNREFUSED".to_string()),
                url: Some(format!("dummy://{}", request.path)),
                method: Some(request.method),
                status: None,
            }),
            "/missing" => Ok(HttpResponse::new(404)
                .with_reason("Not Found")
                .with_method(request.method)
                .with_body(r#"{"error":"no such user"}"#)),
            _ => Ok(HttpResponse::new(200).with_body(r#"{"ok":true}"#)),
        }
    }

    fn endpoint(&self) -> &str { "dummy://" }
}

#[tokio::test]
async fn consumer_can_call_transport() {
    let t = DummyTransport;
    let resp = t.send(HttpRequest::get("/ping")).await.expect("ok");
    assert!(resp.is_success());
    assert_eq!(resp.json().expect("json body")["ok"], true);
    assert!(classify(&resp).is_none());
}

#[tokio::test]
async fn consumer_sees_domain_failure_without_transport_error() {
    let t = DummyTransport;
    let resp = t.send(HttpRequest::get("/missing")).await.expect("response exists");
    let failure = classify(&resp).expect("404 is a domain failure");
    assert_eq!(failure.message, "no such user");
    assert_eq!(failure.method.as_deref(), Some("GET"));
}

#[tokio::test]
async fn consumer_sees_transport_error() {
    let t = DummyTransport;
    let err = t.send(HttpRequest::get("/down")).await.expect_err("should err");
    assert_eq!(err.code(), Some("ECONNREFUSED"));
    assert_eq!(err.url(), Some("dummy:///down"));
}
