//! Fill in request values the caller left unset.

use super::Interceptor;
use crate::client::{BoxFut, Client, ClientResult};
use crate::request::{Headers, Method, Request};
use serde_json::Value;

/// Applies [`DefaultRequestConfig`] to each request before delegating.
///
/// Explicit request values always win: a header the request already carries
/// is never replaced, and neither is a method, entity or param name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRequest;

#[derive(Debug, Clone, Default)]
pub struct DefaultRequestConfig {
    pub method: Option<Method>,
    pub entity: Option<Value>,
    pub headers: Headers,
    pub params: Vec<(String, String)>,
}

impl DefaultRequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn entity(mut self, entity: impl Into<Value>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    fn apply(&self, request: &mut Request) {
        if request.method.is_none() {
            request.method = self.method.clone();
        }
        if request.entity.is_none() {
            request.entity = self.entity.clone();
        }
        for (name, value) in self.headers.iter() {
            if !request.headers.contains(name) {
                request.headers.insert(name, value);
            }
        }
        for (name, value) in &self.params {
            if !request.params.iter().any(|(k, _)| k == name) {
                request.params.push((name.clone(), value.clone()));
            }
        }
    }
}

impl Interceptor for DefaultRequest {
    type Config = DefaultRequestConfig;

    fn name(&self) -> &str {
        "default-request"
    }

    fn intercept<'a>(
        &'a self,
        mut request: Request,
        next: &'a dyn Client,
        config: &'a DefaultRequestConfig,
    ) -> BoxFut<'a, ClientResult> {
        config.apply(&mut request);
        next.call(request)
    }
}
