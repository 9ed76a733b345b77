//! Mock transport for testing without a network.
//!
//! [`MockTransport`] returns pre-configured replies in order and records
//! every request it was asked to send, allowing deterministic tests of
//! clients and interceptors.
//!
//! # Example
//!
//! ```
//! use rest_chain::transport::MockTransport;
//!
//! let mock = MockTransport::ok("Hello, world!");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{NativeRequest, Transport, TransportError};
use crate::error::{Error, Result};
use crate::response::RawResponse;

/// A test transport that returns canned replies in order.
///
/// Cycles back to the beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockTransport {
    replies: Vec<std::result::Result<RawResponse, TransportError>>,
    index: AtomicUsize,
    delay: Option<Duration>,
    sent: Mutex<Vec<NativeRequest>>,
}

impl MockTransport {
    /// Create a mock transport with the given replies.
    ///
    /// Replies are returned in order. When exhausted, cycles from the beginning.
    pub fn sequence(replies: Vec<std::result::Result<RawResponse, TransportError>>) -> Self {
        assert!(!replies.is_empty(), "MockTransport requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
            delay: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with the same response.
    pub fn fixed(raw: RawResponse) -> Self {
        Self::sequence(vec![Ok(raw)])
    }

    /// Always reply `200 OK` with `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::fixed(RawResponse::ok(body))
    }

    /// Replay responses recorded as a JSON array of [`RawResponse`] objects.
    ///
    /// ```
    /// use rest_chain::MockTransport;
    ///
    /// let mock = MockTransport::from_json(
    ///     r#"[{"status": 503}, {"status": 200, "status_text": "OK", "body": "up"}]"#,
    /// ).unwrap();
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let replies: Vec<RawResponse> = serde_json::from_str(json)?;
        if replies.is_empty() {
            return Err(Error::InvalidConfig(
                "mock fixture contains no responses".into(),
            ));
        }
        Ok(Self::sequence(replies.into_iter().map(Ok).collect()))
    }

    /// Always fail at the connection level.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::sequence(vec![Err(TransportError::Connect(reason.into()))])
    }

    /// Wait this long before replying, like a slow server.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests that reached the transport.
    pub fn calls(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or_default()
    }

    /// Requests that reached the transport, oldest first.
    pub fn sent(&self) -> Vec<NativeRequest> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn next_reply(&self) -> std::result::Result<RawResponse, TransportError> {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        self.replies[idx].clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        request: NativeRequest,
    ) -> std::result::Result<RawResponse, TransportError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_reply()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
