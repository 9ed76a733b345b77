use super::Interceptor;
use crate::client::{BoxFut, Client, ClientResult};
use crate::error::{ClientError, ErrorKind};
use crate::request::Request;
use std::time::Duration;

/// Cancels requests that have not settled within a deadline.
///
/// On expiry the request token is canceled and the inner client gets
/// [`TimeoutConfig::grace`] to settle (transports abort promptly); its
/// outcome is re-tagged `timeout`. An inner client that ignores the token
/// is abandoned and the request settles as `timeout` regardless.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timeout;

#[derive(Debug, Clone, Copy)]
pub struct TimeoutConfig {
    pub timeout: Duration,
    /// How long the inner client may take to settle once canceled. Default: 100 ms.
    pub grace: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl TimeoutConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            grace: Duration::from_millis(100),
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}

impl Interceptor for Timeout {
    type Config = TimeoutConfig;

    fn name(&self) -> &str {
        "timeout"
    }

    fn intercept<'a>(
        &'a self,
        request: Request,
        next: &'a dyn Client,
        config: &'a TimeoutConfig,
    ) -> BoxFut<'a, ClientResult> {
        Box::pin(async move {
            let token = request.cancel_handle();
            let snapshot = request.snapshot();
            let call = next.call(request);
            tokio::pin!(call);

            tokio::select! {
                result = &mut call => result,
                _ = tokio::time::sleep(config.timeout) => {
                    tracing::debug!(
                        path = %snapshot.path,
                        timeout_ms = config.timeout.as_millis() as u64,
                        "request timed out, canceling"
                    );
                    token.cancel();
                    match tokio::time::timeout(config.grace, call).await {
                        Ok(Ok(response)) => Err(ClientError::from_response(response, ErrorKind::Timeout)),
                        Ok(Err(err)) => Err(err.with_kind(ErrorKind::Timeout)),
                        Err(_) => {
                            tracing::warn!(
                                path = %snapshot.path,
                                "inner client ignored cancellation, abandoning it"
                            );
                            Err(ClientError::new(snapshot, ErrorKind::Timeout))
                        }
                    }
                }
            }
        })
    }
}
