use super::Interceptor;
use crate::client::{BoxFut, Client, ClientResult};
use crate::events::{emit, Event, EventHandler};
use crate::request::Request;
use std::sync::Arc;

/// Reports each request's start and settlement to an [`EventHandler`] and
/// to `tracing`.
///
/// Chain it outermost to see the request as the caller built it and the
/// final outcome after every other interceptor.
#[derive(Default)]
pub struct Observe {
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl Observe {
    pub fn new(handler: Arc<dyn EventHandler>) -> Self {
        Self {
            event_handler: Some(handler),
        }
    }

    /// Trace only.
    pub fn tracing_only() -> Self {
        Self::default()
    }
}

impl Interceptor for Observe {
    type Config = ();

    fn name(&self) -> &str {
        "observe"
    }

    fn intercept<'a>(
        &'a self,
        request: Request,
        next: &'a dyn Client,
        _config: &'a (),
    ) -> BoxFut<'a, ClientResult> {
        Box::pin(async move {
            let path = request.path.clone();
            let method = request.method.as_ref().map(|m| m.to_string());
            tracing::debug!(path = %path, method = ?method, "request start");
            emit(&self.event_handler, Event::RequestStart { method, path });

            let result = next.call(request).await;

            let response = match &result {
                Ok(response) => response,
                Err(err) => err.response(),
            };
            let method = response.request().method.as_ref().map(|m| m.to_string());
            let status = response.status_code();
            let error = response.error.as_ref().map(|e| e.tag());
            match &error {
                None => tracing::debug!(path = %response.request().path, status = ?status, "request complete"),
                Some(tag) => tracing::debug!(path = %response.request().path, error = %tag, "request failed"),
            }
            emit(
                &self.event_handler,
                Event::RequestEnd {
                    path: response.request().path.clone(),
                    method,
                    status,
                    error,
                },
            );

            result
        })
    }
}
