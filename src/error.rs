use crate::request::Request;
use crate::response::Response;
use thiserror::Error;

/// Failure tags carried by a failed [`Response`].
///
/// The `Display` output is the stable tag string callers match on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was already canceled before it was dispatched.
    #[error("precanceled")]
    Precanceled,

    /// The request was canceled while the transport call was outstanding.
    #[error("aborted")]
    Aborted,

    /// Connection-level failure before any response was received.
    #[error("loaderror")]
    LoadError,

    /// No native transport exists in this environment.
    #[error("native-transport-unavailable")]
    TransportUnavailable,

    /// The request did not settle within the configured deadline.
    #[error("timeout")]
    Timeout,

    /// A response arrived but its status code was flagged as an error.
    #[error("http-error")]
    HttpStatus(u16),

    /// Interceptor-defined tag.
    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// The tag string, e.g. `"precanceled"`.
    pub fn tag(&self) -> String {
        self.to_string()
    }

    /// Whether the failure came from cancellation of the request token.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            ErrorKind::Precanceled | ErrorKind::Aborted | ErrorKind::Timeout
        )
    }
}

/// The failure side of a client call.
///
/// Always wraps a well-formed [`Response`] whose `error` is set and whose
/// request is the one the caller passed in.
#[derive(Error, Debug)]
#[error("request to '{path}' failed: {kind}", path = .response.request().path)]
pub struct ClientError {
    kind: ErrorKind,
    response: Box<Response>,
}

impl ClientError {
    /// Fail a request that produced no native result.
    pub fn new(request: Request, kind: ErrorKind) -> Self {
        Self::from_response(Response::new(request), kind)
    }

    /// Fail with an existing response, keeping its status, headers and body.
    pub fn from_response(mut response: Response, kind: ErrorKind) -> Self {
        response.error = Some(kind.clone());
        Self {
            kind,
            response: Box::new(response),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn request(&self) -> &Request {
        self.response.request()
    }

    pub fn into_response(self) -> Response {
        *self.response
    }

    pub fn into_request(self) -> Request {
        self.response.into_request()
    }

    /// Re-tag the failure, keeping the response.
    pub fn with_kind(self, kind: ErrorKind) -> Self {
        Self::from_response(*self.response, kind)
    }
}

/// Errors raised while configuring or building a client.
#[derive(Error, Debug)]
pub enum Error {
    /// The reqwest client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON handling failed at the serde level.
    #[error("JSON handling failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration detected at build time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
