//! Interceptors and client composition.
//!
//! An [`Interceptor`] receives the request, the next inner client and its
//! own config. It may delegate unchanged, short-circuit with its own
//! outcome, or post-process what the inner client returns.
//!
//! ## Ordering
//!
//! ```text
//! client.with(A).with(B)
//!
//!   caller ──► B ──► A ──► transport
//!   caller ◄── B ◄── A ◄── transport
//! ```
//!
//! Built-in interceptors: [`Noop`], [`Fallback`], [`DefaultRequest`],
//! [`PathPrefix`], [`ErrorCode`], [`Timeout`], [`Retry`], [`Observe`].

pub mod backoff;
pub mod default_request;
pub mod error_code;
pub mod fallback;
pub mod observe;
pub mod path_prefix;
pub mod retry;
pub mod timeout;

pub use backoff::{BackoffConfig, JitterStrategy};
pub use default_request::{DefaultRequest, DefaultRequestConfig};
pub use error_code::{ErrorCode, ErrorCodeConfig};
pub use fallback::{Fallback, FallbackConfig};
pub use observe::Observe;
pub use path_prefix::{PathPrefix, PathPrefixConfig};
pub use retry::Retry;
pub use timeout::{Timeout, TimeoutConfig};

use crate::client::{BoxFut, Client, ClientResult, RestClient};
use crate::request::Request;

/// A wrapper that augments a client without changing its contract.
///
/// The trait is object-safe per config type; [`RestClient::chain`] erases
/// it behind [`Chained`].
pub trait Interceptor: Send + Sync {
    /// Interceptor-specific options, supplied at chain time.
    type Config: Send + Sync;

    /// Stable name for logging and diagnostics.
    fn name(&self) -> &str;

    /// Handle one request, delegating to `next` as needed.
    fn intercept<'a>(
        &'a self,
        request: Request,
        next: &'a dyn Client,
        config: &'a Self::Config,
    ) -> BoxFut<'a, ClientResult>;
}

/// An interceptor bound to its config and the client it wraps.
pub struct Chained<I: Interceptor> {
    interceptor: I,
    config: I::Config,
    next: RestClient,
}

impl<I: Interceptor> Chained<I> {
    pub fn new(interceptor: I, config: I::Config, next: RestClient) -> Self {
        Self {
            interceptor,
            config,
            next,
        }
    }
}

impl<I: Interceptor> Client for Chained<I> {
    fn name(&self) -> &str {
        self.interceptor.name()
    }

    fn call<'a>(&'a self, request: Request) -> BoxFut<'a, ClientResult> {
        self.interceptor.intercept(request, &self.next, &self.config)
    }
}

/// Passes every request and response through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Interceptor for Noop {
    type Config = ();

    fn name(&self) -> &str {
        "noop"
    }

    fn intercept<'a>(
        &'a self,
        request: Request,
        next: &'a dyn Client,
        _config: &'a (),
    ) -> BoxFut<'a, ClientResult> {
        next.call(request)
    }
}
