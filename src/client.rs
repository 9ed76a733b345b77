//! The [`Client`] contract and the chainable [`RestClient`].
//!
//! A client turns a [`Request`] into a future that settles exactly once,
//! to a [`Response`] on success or a [`ClientError`] (which still carries a
//! response) on failure. Interceptors wrap clients to form new clients; see
//! [`RestClient::chain`].

use crate::error::ClientError;
use crate::interceptor::{Chained, Interceptor};
use crate::request::Request;
use crate::response::Response;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, pinned, Send future; the return type of [`Client::call`].
pub type BoxFut<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of a client call.
pub type ClientResult = std::result::Result<Response, ClientError>;

/// Object-safe request executor.
///
/// Implementations never panic on a bad request; every failure settles as a
/// [`ClientError`] whose response holds the original request.
pub trait Client: Send + Sync {
    /// Instance name (for logging/debugging/events).
    fn name(&self) -> &str;

    /// Execute the request.
    fn call<'a>(&'a self, request: Request) -> BoxFut<'a, ClientResult>;
}

/// A composed client that can be chained further.
///
/// Cheap to clone. Each [`chain`](RestClient::chain) returns a new client
/// wrapping this one, so the last interceptor applied sees requests first.
///
/// # Example
///
/// ```
/// use rest_chain::{RestClient, MockTransport, TransportClient, Request};
/// use rest_chain::interceptor::{Noop, ErrorCode};
///
/// # tokio_test::block_on(async {
/// let client = RestClient::new(TransportClient::new(MockTransport::ok("hi")))
///     .with(ErrorCode)
///     .with(Noop);
///
/// let response = client.call(Request::new("/")).await.unwrap();
/// assert_eq!(response.entity.as_deref(), Some("hi"));
/// # });
/// ```
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<dyn Client>,
}

impl RestClient {
    pub fn new(client: impl Client + 'static) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    pub fn from_arc(client: Arc<dyn Client>) -> Self {
        Self { inner: client }
    }

    /// Create a configured client. See [`ClientBuilder`](crate::config::ClientBuilder).
    pub fn builder() -> crate::config::ClientBuilder {
        crate::config::ClientBuilder::new()
    }

    /// Wrap this client with `interceptor`, configured by `config`.
    pub fn chain<I>(&self, interceptor: I, config: I::Config) -> RestClient
    where
        I: Interceptor + 'static,
        I::Config: 'static,
    {
        RestClient::new(Chained::new(interceptor, config, self.clone()))
    }

    /// Wrap this client with `interceptor` using its default config.
    pub fn with<I>(&self, interceptor: I) -> RestClient
    where
        I: Interceptor + 'static,
        I::Config: Default + 'static,
    {
        self.chain(interceptor, I::Config::default())
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Execute the request.
    pub fn call(&self, request: Request) -> BoxFut<'_, ClientResult> {
        self.inner.call(request)
    }
}

impl Client for RestClient {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn call<'a>(&'a self, request: Request) -> BoxFut<'a, ClientResult> {
        self.inner.call(request)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("name", &self.inner.name())
            .finish()
    }
}

/// A [`Client`] backed by a closure.
///
/// Handy for stub clients in tests and adapters.
///
/// # Example
///
/// ```
/// use rest_chain::client::FnClient;
/// use rest_chain::{RestClient, Request, Response};
///
/// let echo = RestClient::new(FnClient::new("echo", |request: Request| async move {
///     Ok(Response::new(request))
/// }));
/// ```
pub struct FnClient<F> {
    name: String,
    f: F,
}

impl<F> FnClient<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F, Fut> Client for FnClient<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = ClientResult> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call<'a>(&'a self, request: Request) -> BoxFut<'a, ClientResult> {
        Box::pin((self.f)(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::interceptor::Noop;
    use crate::request::Method;

    fn echo() -> RestClient {
        RestClient::new(FnClient::new("echo", |request: Request| {
            futures::future::ready(Ok(Response::new(request)))
        }))
    }

    #[tokio::test]
    async fn test_fn_client_returns_same_request() {
        let request = Request::new("/things").with_method(Method::DELETE);
        let handle = request.cancel_handle();
        let response = echo().call(request).await.unwrap();
        assert!(response.request().token().same_as(&handle));
        assert_eq!(response.request().method, Some(Method::DELETE));
    }

    #[tokio::test]
    async fn test_chain_is_composable_to_any_depth() {
        let client = echo().with(Noop).with(Noop).chain(Noop, ()).with(Noop);
        let response = client.call(Request::new("/deep")).await.unwrap();
        assert_eq!(response.request().path, "/deep");
        assert_eq!(client.name(), "noop");
    }

    #[tokio::test]
    async fn test_noop_leaves_request_and_response_untouched() {
        let client = echo().with(Noop);
        let request = Request::new("/").with_header("X-A", "1").with_param("q", "v");
        let response = client.call(request).await.unwrap();
        assert!(response.request().method.is_none());
        assert_eq!(response.request().headers.get("x-a"), Some("1"));
        assert_eq!(response.request().params, vec![("q".to_string(), "v".to_string())]);
        assert!(response.entity.is_none());
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_failure_is_a_value() {
        let failing = RestClient::new(FnClient::new("failing", |request: Request| async move {
            Err(ClientError::new(request, ErrorKind::LoadError))
        }));
        let err = failing.call(Request::new("/x")).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::LoadError);
        assert_eq!(err.request().path, "/x");
    }

    #[test]
    fn test_debug_shows_outer_name() {
        let client = echo();
        assert_eq!(format!("{:?}", client), r#"RestClient { name: "echo" }"#);
    }
}
