//! # REST Chain
//!
//! An interceptor-chained HTTP client core with cooperative cancellation.
//!
//! A **transport client** issues native requests. **Interceptors** wrap a
//! client to form a new client that can itself be wrapped again, so cross
//! cutting behavior (fallback transports, default headers, retries,
//! timeouts, error mapping) composes without the inner client knowing.
//!
//! ## Core Concepts
//!
//! - **[`Request`]**: path, optional method, entity, headers, params, and a
//!   per-request [`CancelToken`].
//! - **[`Client`]**: object-safe trait: `call(Request)` returns a future
//!   that settles once, to a [`Response`] or a [`ClientError`] that still
//!   carries one.
//! - **[`RestClient`]**: a composed client; `chain(interceptor, config)`
//!   returns another `RestClient`.
//! - **[`Interceptor`]**: `(request, next, config) -> future`.
//! - **[`TransportClient`]**: the innermost client, over a [`Transport`]
//!   such as [`HttpTransport`] (reqwest) or [`MockTransport`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use rest_chain::{Request, RestClient};
//! use rest_chain::interceptor::BackoffConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RestClient::builder()
//!         .base_url("http://localhost:8080")
//!         .error_code(400)
//!         .backoff(BackoffConfig::standard())
//!         .build()?;
//!
//!     let request = Request::new("/items").with_entity(serde_json::json!({"name": "widget"}));
//!
//!     match client.call(request).await {
//!         Ok(response) => println!("{:?} {:?}", response.status, response.entity),
//!         Err(err) => println!("failed: {}", err.kind()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod interceptor;
pub mod request;
pub mod response;
pub mod transport;

pub use cancel::CancelToken;
pub use client::{BoxFut, Client, ClientResult, FnClient, RestClient};
pub use config::ClientBuilder;
pub use error::{ClientError, Error, ErrorKind, Result};
pub use interceptor::{Interceptor, Noop};
pub use request::{Headers, Method, Request};
pub use response::{RawResponse, ReadyState, Response, Status};
pub use transport::{HttpTransport, MockTransport, NativeRequest, Transport, TransportClient};

/// The default client: a transport client over reqwest with no interceptors.
///
/// It has no base URL, so request paths must be absolute URLs; a relative
/// path such as `"/"` settles as `loaderror`. Use
/// [`RestClient::builder()`] with [`base_url`](ClientBuilder::base_url) to
/// send relative paths.
pub fn default_client() -> RestClient {
    RestClient::new(TransportClient::new(HttpTransport::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_is_chainable_transport() {
        let client = default_client();
        assert_eq!(client.name(), "http");
        let chained = client.with(Noop);
        assert_eq!(chained.name(), "noop");
    }

    #[tokio::test]
    async fn test_default_client_rejects_relative_paths() {
        for path in ["/", ""] {
            let err = default_client().call(Request::new(path)).await.unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::LoadError);
            assert_eq!(err.request().path, path);
        }
    }
}
