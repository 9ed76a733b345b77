//! Client configuration.
//!
//! [`ClientBuilder`] assembles a [`RestClient`] from a transport and a
//! standard set of interceptors. It is designed to be used once at startup;
//! the resulting client is cheap to clone and share.
//!
//! Layer order, outermost first:
//!
//! ```text
//! Observe ─► DefaultRequest ─► Timeout ─► Retry ─► ErrorCode ─► TransportClient
//! ```

use crate::client::RestClient;
use crate::error::{Error, Result};
use crate::events::EventHandler;
use crate::interceptor::{
    BackoffConfig, DefaultRequest, DefaultRequestConfig, ErrorCode, ErrorCodeConfig, Observe,
    Retry, Timeout, TimeoutConfig,
};
use crate::request::Headers;
use crate::transport::{HttpTransport, Transport, TransportClient};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Builder for a configured [`RestClient`].
///
/// # Example
///
/// ```
/// use rest_chain::RestClient;
/// use rest_chain::interceptor::BackoffConfig;
/// use std::time::Duration;
///
/// let client = RestClient::builder()
///     .base_url("http://localhost:8080/api")
///     .header("Accept", "application/json")
///     .error_code(400)
///     .backoff(BackoffConfig::interactive())
///     .request_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    http_client: Option<Client>,
    transport: Option<Arc<dyn Transport>>,
    timeout: Option<Duration>,
    headers: Headers,
    error_code: Option<u16>,
    request_timeout: Option<Duration>,
    backoff: Option<BackoffConfig>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative request paths against this URL. Trailing slashes are trimmed.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the HTTP client. If not set, a default client is created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Replace the reqwest transport, e.g. with a
    /// [`MockTransport`](crate::transport::MockTransport).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the reqwest client timeout. Default: 60 seconds.
    ///
    /// Ignored when a custom client is provided via [`http_client`](Self::http_client)
    /// or a custom transport via [`transport`](Self::transport).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a default header, applied when a request lacks it.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Fail responses with a status code at or above `code`.
    pub fn error_code(mut self, code: u16) -> Self {
        self.error_code = Some(code);
        self
    }

    /// Cancel requests that have not settled within `timeout`.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Retry transient failures. Default: [`BackoffConfig::none()`].
    pub fn backoff(mut self, config: BackoffConfig) -> Self {
        self.backoff = Some(config);
        self
    }

    /// Report lifecycle events to `handler`.
    pub fn event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<RestClient> {
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::InvalidConfig(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        if self.error_code.is_some_and(|c| !(100..=599).contains(&c)) {
            return Err(Error::InvalidConfig(format!(
                "error_code {} is not an HTTP status code",
                self.error_code.unwrap_or_default()
            )));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let client = match self.http_client {
                    Some(client) => client,
                    None => Client::builder()
                        .timeout(self.timeout.unwrap_or(Duration::from_secs(60)))
                        .build()?,
                };
                let mut http = HttpTransport::with_client(client);
                if let Some(base) = self.base_url.as_deref() {
                    http = http.base_url(normalize_base_url(base));
                }
                Arc::new(http) as Arc<dyn Transport>
            }
        };

        let mut client = RestClient::new(TransportClient::from_arc(transport));

        if let Some(code) = self.error_code {
            client = client.chain(ErrorCode, ErrorCodeConfig { code });
        }
        if let Some(backoff) = self.backoff.filter(|b| b.max_retries > 0) {
            let retry = match &self.event_handler {
                Some(handler) => Retry::new().with_event_handler(handler.clone()),
                None => Retry::new(),
            };
            client = client.chain(retry, backoff);
        }
        if let Some(timeout) = self.request_timeout {
            client = client.chain(Timeout, TimeoutConfig::new(timeout));
        }
        if !self.headers.is_empty() {
            let defaults = DefaultRequestConfig {
                headers: self.headers,
                ..DefaultRequestConfig::default()
            };
            client = client.chain(DefaultRequest, defaults);
        }
        if let Some(handler) = self.event_handler {
            client = client.with(Observe::new(handler));
        }

        Ok(client)
    }
}

/// Strip trailing slashes from a base URL.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
