//! Native transport over reqwest.
//!
//! [`HttpTransport`] issues each [`NativeRequest`] with a shared
//! `reqwest::Client`. Relative paths are resolved against an optional base
//! URL. Repeated response headers are joined with `", "`.
//!
//! `status_text` is the canonical reason phrase for the status code
//! (`"Not Found"` for 404), not the phrase the server wrote on the status
//! line; reqwest does not expose the latter. Unknown codes get `""`.
//!
//! Without a base URL every path must be an absolute URL; a relative path
//! cannot be sent and fails as a connection error.

use super::{NativeRequest, Transport, TransportError};
use crate::request::Headers;
use crate::response::{RawResponse, ReadyState};
use async_trait::async_trait;
use reqwest::Client;

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
    base_url: Option<String>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing client (cheap to clone -- uses `Arc` internally).
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Resolve relative paths against `base_url`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    fn resolve(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) if !path.contains("://") => {
                format!("{}/{}", base, path.trim_start_matches('/'))
            }
            _ => path.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: NativeRequest) -> Result<RawResponse, TransportError> {
        let url = self.resolve(&request.url);
        let mut builder = self.client.request(request.method, &url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Connect(format!("{}: {}", url, e)))?;

        let status = resp.status();
        let headers: Headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
            ready_state: ReadyState::Done,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
