use crate::error::ErrorKind;
use crate::request::{Headers, Request};
use serde::{Deserialize, Serialize};

/// Progress of the native operation when its snapshot was taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    Unsent,
    Opened,
    HeadersReceived,
    Loading,
    #[default]
    Done,
}

/// What the native transport reported, passed through untouched.
///
/// Serializable so recorded exchanges can be replayed from JSON fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    pub status: u16,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub ready_state: ReadyState,
}

impl RawResponse {
    /// A completed exchange.
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: Headers::new(),
            body: body.into(),
            ready_state: ReadyState::Done,
        }
    }

    /// A `200 OK` with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, "OK", body)
    }

    /// Snapshot of an operation that was torn down before completing.
    pub fn unsent() -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: Headers::new(),
            body: String::new(),
            ready_state: ReadyState::Unsent,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: u16,
    pub text: String,
}

/// The single response produced for a [`Request`].
#[derive(Debug)]
pub struct Response {
    request: Request,
    pub raw: Option<RawResponse>,
    pub entity: Option<String>,
    pub status: Option<Status>,
    pub headers: Headers,
    /// Set when the request could not be completed.
    pub error: Option<ErrorKind>,
}

impl Response {
    /// An empty response correlated with `request`.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            raw: None,
            entity: None,
            status: None,
            headers: Headers::new(),
            error: None,
        }
    }

    /// Populate status, headers and entity from the native result.
    pub fn from_raw(request: Request, raw: RawResponse) -> Self {
        Self {
            request,
            entity: Some(raw.body.clone()),
            status: Some(Status {
                code: raw.status,
                text: raw.status_text.clone(),
            }),
            headers: raw.headers.clone(),
            raw: Some(raw),
            error: None,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status.as_ref().map(|s| s.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_mirrors_transport() {
        let raw = RawResponse::new(201, "Created", "made it")
            .with_header("Content-Type", "text/plain")
            .with_header("X-Id", "7");
        let response = Response::from_raw(Request::new("/"), raw.clone());

        assert_eq!(response.entity.as_deref(), Some("made it"));
        assert_eq!(response.status_code(), Some(201));
        assert_eq!(response.status.as_ref().unwrap().text, "Created");
        for (name, value) in response.headers.iter() {
            assert_eq!(raw.headers.get(name), Some(value));
        }
        assert_eq!(response.raw, Some(raw));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_unsent_snapshot() {
        let raw = RawResponse::unsent();
        assert_eq!(raw.status, 0);
        assert!(raw.ready_state < ReadyState::Done);
    }

    #[test]
    fn test_new_response_is_empty() {
        let response = Response::new(Request::new("/x"));
        assert_eq!(response.request().path, "/x");
        assert!(response.raw.is_none());
        assert!(response.status_code().is_none());
    }
}
