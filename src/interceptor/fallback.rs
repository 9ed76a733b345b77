//! Substitute an alternate client when the native transport is missing.
//!
//! The condition is evaluated once, when the [`FallbackConfig`] is built.
//! When it holds, every request goes to the alternate client. When it does
//! not, requests go to the inner client and a
//! `native-transport-unavailable` failure is retried on the alternate.

use super::Interceptor;
use crate::client::{BoxFut, Client, ClientResult, RestClient};
use crate::error::ErrorKind;
use crate::request::Request;

/// Routes requests to an alternate client.
#[derive(Debug, Clone)]
pub struct Fallback {
    alternate: RestClient,
}

impl Fallback {
    pub fn new(alternate: RestClient) -> Self {
        Self { alternate }
    }
}

/// Whether [`Fallback`] routes unconditionally to its alternate client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallbackConfig {
    condition: bool,
}

impl FallbackConfig {
    /// Route everything to the alternate client.
    pub fn always() -> Self {
        Self { condition: true }
    }

    /// Only fall back when the inner client reports no native transport.
    pub fn never() -> Self {
        Self { condition: false }
    }

    /// Evaluate `predicate` now and keep the answer.
    pub fn when(predicate: impl FnOnce() -> bool) -> Self {
        Self {
            condition: predicate(),
        }
    }

    pub fn condition(&self) -> bool {
        self.condition
    }
}

impl From<bool> for FallbackConfig {
    fn from(condition: bool) -> Self {
        Self { condition }
    }
}

impl Interceptor for Fallback {
    type Config = FallbackConfig;

    fn name(&self) -> &str {
        "fallback"
    }

    fn intercept<'a>(
        &'a self,
        request: Request,
        next: &'a dyn Client,
        config: &'a FallbackConfig,
    ) -> BoxFut<'a, ClientResult> {
        if config.condition {
            return self.alternate.call(request);
        }
        Box::pin(async move {
            match next.call(request).await {
                Err(err) if err.kind() == &ErrorKind::TransportUnavailable => {
                    tracing::debug!(
                        path = %err.request().path,
                        alternate = %self.alternate.name(),
                        "native transport unavailable, using fallback"
                    );
                    self.alternate.call(err.into_request()).await
                }
                other => other,
            }
        })
    }
}
