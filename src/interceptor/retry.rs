//! Retry as an outer interceptor.
//!
//! The transport never retries. Wrapping a client with [`Retry`] re-issues
//! the same request (same token, same identity) when the inner client fails
//! with a retryable [`ErrorKind`], waiting per [`BackoffConfig`] between
//! attempts. A cancel during the wait ends the loop with `aborted`.

use super::backoff::BackoffConfig;
use super::Interceptor;
use crate::client::{BoxFut, Client, ClientResult};
use crate::error::{ClientError, ErrorKind};
use crate::events::{emit, Event, EventHandler};
use crate::request::Request;
use std::sync::Arc;

/// Retries transient failures with exponential backoff.
#[derive(Default)]
pub struct Retry {
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl Retry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report each retry as [`Event::Retry`].
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }
}

impl Interceptor for Retry {
    type Config = BackoffConfig;

    fn name(&self) -> &str {
        "retry"
    }

    fn intercept<'a>(
        &'a self,
        request: Request,
        next: &'a dyn Client,
        config: &'a BackoffConfig,
    ) -> BoxFut<'a, ClientResult> {
        Box::pin(async move {
            let mut request = request;
            let mut attempt: u32 = 0;

            loop {
                let err = match next.call(request).await {
                    Ok(response) => return Ok(response),
                    Err(err) => err,
                };

                if attempt >= config.max_retries || !config.is_retryable(err.kind()) {
                    return Err(err);
                }

                let delay = config.delay_after(err.response(), attempt);
                attempt += 1;
                let reason = err.kind().tag();
                tracing::debug!(
                    path = %err.request().path,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    reason = %reason,
                    "retrying request"
                );
                emit(
                    &self.event_handler,
                    Event::Retry {
                        path: err.request().path.clone(),
                        attempt,
                        delay_ms: delay.as_millis() as u64,
                        reason,
                    },
                );

                let token = err.request().cancel_handle();
                tokio::select! {
                    biased;
                    _ = token.canceled() => return Err(err.with_kind(ErrorKind::Aborted)),
                    _ = tokio::time::sleep(delay) => {}
                }

                request = err.into_request();
            }
        })
    }
}
