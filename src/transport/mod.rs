//! Transport trait and the innermost client.
//!
//! A [`Transport`] is the native request-issuing primitive: it takes a
//! fully resolved [`NativeRequest`] and reports a [`RawResponse`]. Aborting
//! an in-flight call is dropping its future. [`TransportClient`] adapts a
//! transport to the [`Client`] contract.
//!
//! ## Request journey
//!
//! ```text
//! created ──► canceled? ──yes──► failed (precanceled)
//!                │no
//!                ▼
//!            transport? ──no───► failed (native-transport-unavailable)
//!                │yes
//!                ▼
//!           dispatched ──cancel──► failed (aborted)
//!                │
//!        ┌───────┴────────┐
//!   load error        completed
//!  failed (loaderror)
//! ```

pub mod http;
pub mod mock;

pub use self::http::HttpTransport;
pub use mock::MockTransport;

use crate::client::{BoxFut, Client, ClientResult};
use crate::error::{ClientError, ErrorKind};
use crate::request::{Headers, Method, Request};
use crate::response::{RawResponse, Response};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// The request as handed to a native transport, with the method resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub params: Vec<(String, String)>,
    pub body: Option<String>,
}

impl NativeRequest {
    /// Snapshot a request whose method has already been resolved.
    pub fn from_request(request: &Request) -> Self {
        Self {
            method: request.resolved_method(),
            url: request.path.clone(),
            headers: request.headers.clone(),
            params: request.params.clone(),
            body: request.body(),
        }
    }
}

/// Failures reported by a native transport before any response arrived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established or was reset.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Abstraction over native request-issuing primitives.
///
/// Implementors issue the call and report status, headers and body. They
/// need not watch for cancellation: [`TransportClient`] drops the future
/// returned by [`send`](Transport::send) to abort.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and wait for the full response.
    async fn send(&self, request: NativeRequest) -> Result<RawResponse, TransportError>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// The innermost [`Client`]: resolves the default method, dispatches to a
/// [`Transport`], and enforces the cancellation protocol.
#[derive(Clone)]
pub struct TransportClient {
    transport: Option<Arc<dyn Transport>>,
}

impl TransportClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Some(Arc::new(transport)),
        }
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    /// A client for an environment with no native transport. Every request
    /// that is not precanceled fails with `native-transport-unavailable`.
    pub fn unavailable() -> Self {
        Self { transport: None }
    }

    pub fn is_available(&self) -> bool {
        self.transport.is_some()
    }

    async fn dispatch(&self, mut request: Request) -> ClientResult {
        if request.is_canceled() {
            tracing::debug!(path = %request.path, "request canceled before dispatch");
            return Err(ClientError::new(request, ErrorKind::Precanceled));
        }
        let Some(transport) = self.transport.as_ref() else {
            return Err(ClientError::new(request, ErrorKind::TransportUnavailable));
        };

        request.resolve_method();
        let native = NativeRequest::from_request(&request);
        let token = request.cancel_handle();
        tracing::debug!(
            transport = transport.name(),
            method = %native.method,
            path = %native.url,
            "dispatching request"
        );

        let outcome = tokio::select! {
            biased;
            _ = token.canceled() => None,
            result = transport.send(native) => Some(result),
        };

        match outcome {
            None => {
                tracing::debug!(path = %request.path, "request aborted in flight");
                let mut response = Response::new(request);
                response.raw = Some(RawResponse::unsent());
                Err(ClientError::from_response(response, ErrorKind::Aborted))
            }
            // Canceled after the transport finished but before we observed it.
            Some(Ok(raw)) if token.is_canceled() => Err(ClientError::from_response(
                Response::from_raw(request, raw),
                ErrorKind::Aborted,
            )),
            Some(Ok(raw)) => {
                tracing::debug!(path = %request.path, status = raw.status, "request complete");
                Ok(Response::from_raw(request, raw))
            }
            Some(Err(_)) if token.is_canceled() => {
                tracing::debug!(path = %request.path, "request aborted as transport failed");
                Err(ClientError::new(request, ErrorKind::Aborted))
            }
            Some(Err(e)) => {
                tracing::warn!(path = %request.path, error = %e, "transport failed");
                Err(ClientError::new(request, ErrorKind::LoadError))
            }
        }
    }
}

impl Client for TransportClient {
    fn name(&self) -> &str {
        self.transport.as_ref().map_or("unavailable", |t| t.name())
    }

    fn call<'a>(&'a self, request: Request) -> BoxFut<'a, ClientResult> {
        Box::pin(self.dispatch(request))
    }
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("transport", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ReadyState;
    use crate::RestClient;
    use std::time::Duration;

    fn canned() -> RawResponse {
        RawResponse::new(200, "OK", "hello back")
            .with_header("Content-Type", "text/plain")
            .with_header("X-Served-By", "mock")
    }

    fn assert_mirrors(response: &Response) {
        let raw = response.raw.as_ref().expect("raw result");
        assert_eq!(response.entity.as_deref(), Some(raw.body.as_str()));
        let status = response.status.as_ref().unwrap();
        assert_eq!(status.code, raw.status);
        assert_eq!(status.text, raw.status_text);
        for (name, value) in response.headers.iter() {
            assert_eq!(raw.headers.get(name), Some(value));
        }
    }

    #[tokio::test]
    async fn test_get_by_default() {
        let mock = Arc::new(MockTransport::fixed(canned()));
        let client = TransportClient::from_arc(mock.clone());

        let request = Request::new("/");
        let handle = request.cancel_handle();
        let response = client.call(request).await.unwrap();

        assert!(response.request().token().same_as(&handle));
        assert_eq!(response.request().method, Some(Method::GET));
        assert_mirrors(&response);
        assert!(!response.request().is_canceled());
        assert_eq!(mock.sent()[0].method, Method::GET);
    }

    #[tokio::test]
    async fn test_explicit_get() {
        let client = TransportClient::new(MockTransport::fixed(canned()));
        let response = client
            .call(Request::new("/").with_method(Method::GET))
            .await
            .unwrap();
        assert_eq!(response.request().method, Some(Method::GET));
        assert_mirrors(&response);
    }

    #[tokio::test]
    async fn test_post_with_entity() {
        let mock = Arc::new(MockTransport::fixed(canned()));
        let client = TransportClient::from_arc(mock.clone());

        let response = client
            .call(Request::new("/").with_entity("hello world"))
            .await
            .unwrap();

        assert_eq!(response.request().method, Some(Method::POST));
        assert_mirrors(&response);
        let sent = mock.sent();
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].body.as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn test_explicit_post_with_entity() {
        let client = TransportClient::new(MockTransport::fixed(canned()));
        let response = client
            .call(
                Request::new("/")
                    .with_entity("hello world")
                    .with_method(Method::POST),
            )
            .await
            .unwrap();
        assert_eq!(response.request().method, Some(Method::POST));
    }

    #[tokio::test]
    async fn test_precanceled_never_reaches_transport() {
        let mock = Arc::new(MockTransport::fixed(canned()));
        let client = TransportClient::from_arc(mock.clone());

        let request = Request::new("/").canceled(true);
        let handle = request.cancel_handle();
        let err = client.call(request).await.unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::Precanceled);
        assert_eq!(err.response().error, Some(ErrorKind::Precanceled));
        assert!(err.request().is_canceled());
        assert!(err.request().token().same_as(&handle));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_in_flight_aborts() {
        let mock = MockTransport::fixed(canned()).with_delay(Duration::from_secs(10));
        let client = RestClient::new(TransportClient::new(mock));

        let request = Request::new("/wait");
        let handle = request.cancel_handle();
        let (result, _) = tokio::join!(client.call(request), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(!handle.is_canceled());
            handle.cancel();
            assert!(handle.is_canceled());
        });

        let err = tokio_test::assert_err!(result);
        assert_eq!(err.kind(), &ErrorKind::Aborted);
        assert!(err.request().is_canceled());
        let raw = err.response().raw.as_ref().unwrap();
        assert_eq!(raw.status, 0);
        assert!(raw.ready_state <= ReadyState::Loading);
    }

    #[tokio::test]
    async fn test_unavailable_transport() {
        let client = TransportClient::unavailable();
        let request = Request::new("/");
        let handle = request.cancel_handle();

        let err = client.call(request).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TransportUnavailable);
        assert_eq!(err.kind().tag(), "native-transport-unavailable");
        assert!(err.request().token().same_as(&handle));
        assert!(!client.is_available());
        assert_eq!(client.name(), "unavailable");
    }

    #[tokio::test]
    async fn test_precanceled_wins_over_unavailable() {
        let err = TransportClient::unavailable()
            .call(Request::new("/").canceled(true))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Precanceled);
    }

    #[tokio::test]
    async fn test_transport_failure_is_loaderror() {
        let client = TransportClient::new(MockTransport::failing("connection refused"));
        let err = client.call(Request::new("http://localhost:1234")).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::LoadError);
        assert_eq!(err.request().path, "http://localhost:1234");
        assert!(err.response().raw.is_none());
    }

    /// Cancels the request it is sending, then fails, so cancel and
    /// failure land in the same poll.
    struct CancelThenFail {
        handle: crate::cancel::CancelToken,
    }

    #[async_trait]
    impl Transport for CancelThenFail {
        async fn send(&self, _request: NativeRequest) -> Result<RawResponse, TransportError> {
            self.handle.cancel();
            Err(TransportError::Connect("reset".into()))
        }

        fn name(&self) -> &'static str {
            "cancel-then-fail"
        }
    }

    #[tokio::test]
    async fn test_cancel_racing_transport_failure_is_aborted() {
        let request = Request::new("/racy");
        let client = TransportClient::new(CancelThenFail {
            handle: request.cancel_handle(),
        });

        let err = client.call(request).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Aborted);
        assert!(err.request().is_canceled());
    }

    #[tokio::test]
    async fn test_native_request_carries_headers_and_params() {
        let mock = Arc::new(MockTransport::fixed(canned()));
        let client = TransportClient::from_arc(mock.clone());
        client
            .call(
                Request::new("/search")
                    .with_header("Accept", "text/plain")
                    .with_param("q", "what is the meaning of life?")
                    .with_entity(serde_json::json!({"foo": "bar"}))
                    .with_method(Method::PUT),
            )
            .await
            .unwrap();

        let sent = &mock.sent()[0];
        assert_eq!(sent.url, "/search");
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(sent.headers.get("accept"), Some("text/plain"));
        assert_eq!(
            sent.params,
            vec![("q".to_string(), "what is the meaning of life?".to_string())]
        );
        assert_eq!(sent.body.as_deref(), Some(r#"{"foo":"bar"}"#));
    }

    #[tokio::test]
    async fn test_each_request_settles_independently() {
        let client = RestClient::new(TransportClient::new(
            MockTransport::fixed(canned()).with_delay(Duration::from_millis(30)),
        ));
        let first = Request::new("/a");
        let second = Request::new("/b");
        let cancel_first = first.cancel_handle();

        let (a, b, _) = tokio::join!(client.call(first), client.call(second), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            cancel_first.cancel();
        });

        assert_eq!(a.unwrap_err().kind(), &ErrorKind::Aborted);
        let b = b.unwrap();
        assert_eq!(b.request().path, "/b");
        assert!(!b.request().is_canceled());
    }
}
