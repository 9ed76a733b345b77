//! Request model and header map.
//!
//! A [`Request`] is moved into a client and comes back inside the
//! [`Response`](crate::response::Response) or
//! [`ClientError`](crate::error::ClientError), so the request a caller
//! inspects afterwards is the very value it sent, including any method the
//! transport resolved on its behalf.

use crate::cancel::CancelToken;
pub use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header names mapped to string values. Lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a header, replacing any existing value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Add a value, joining with `", "` when the header is already present.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(entry) => {
                entry.1.push_str(", ");
                entry.1.push_str(&value);
            }
            None => self.0.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.0.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.append(k, v);
        }
        headers
    }
}

/// A request travelling through a client chain.
///
/// Not `Clone`: the cancellation token is shared by handles, and a request
/// has exactly one response.
#[derive(Debug, Default)]
pub struct Request {
    /// Target path or URL. Empty means root.
    pub path: String,
    /// Explicit method. When unset the transport resolves it (see [`Request::resolved_method`]).
    pub method: Option<Method>,
    /// Request body. Strings are sent verbatim, other shapes as JSON text.
    pub entity: Option<Value>,
    pub headers: Headers,
    /// Query parameters, appended to the URL by the transport.
    pub params: Vec<(String, String)>,
    token: CancelToken,
}

impl Request {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_entity(mut self, entity: impl Into<Value>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Mark the request canceled (or not) before it enters a client.
    ///
    /// Passing `false` leaves an already-canceled token canceled.
    pub fn canceled(self, canceled: bool) -> Self {
        if canceled {
            self.token.cancel();
        }
        self
    }

    /// Cancel the request. Takes effect immediately and is idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.token.is_canceled()
    }

    /// A handle that can cancel this request after it has been moved into a client.
    pub fn cancel_handle(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// A copy sharing this request's token, for settling on its behalf when
    /// the original is held by a client that will not hand it back.
    pub(crate) fn snapshot(&self) -> Request {
        Request {
            path: self.path.clone(),
            method: self.method.clone(),
            entity: self.entity.clone(),
            headers: self.headers.clone(),
            params: self.params.clone(),
            token: self.token.clone(),
        }
    }

    /// The method the transport will use: explicit if set, else POST with an
    /// entity and GET without.
    pub fn resolved_method(&self) -> Method {
        match (&self.method, &self.entity) {
            (Some(method), _) => method.clone(),
            (None, Some(_)) => Method::POST,
            (None, None) => Method::GET,
        }
    }

    /// Write the resolved method back onto the request.
    pub fn resolve_method(&mut self) -> &Method {
        let method = self.resolved_method();
        self.method.get_or_insert(method)
    }

    /// The entity encoded as a request body.
    pub fn body(&self) -> Option<String> {
        self.entity.as_ref().map(|entity| match entity {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
