//! Event system for request lifecycle hooks.
//!
//! Provides an optional, non-intrusive way to observe client execution.
//! The [`Observe`](crate::interceptor::Observe) interceptor reports start
//! and end of each request; [`Retry`](crate::interceptor::Retry) reports
//! each retry. Implement [`EventHandler`] to receive them for metrics,
//! progress tracking or audit logs.

use std::sync::Arc;

/// Events emitted while a request travels through a client chain.
#[derive(Debug, Clone)]
pub enum Event {
    /// A request entered the observing layer.
    RequestStart {
        /// Method if already known; unset methods are resolved by the transport.
        method: Option<String>,
        path: String,
    },
    /// A request settled.
    RequestEnd {
        path: String,
        /// Resolved method as seen on the settled request.
        method: Option<String>,
        /// Status code if the transport produced one.
        status: Option<u16>,
        /// Error tag on failure.
        error: Option<String>,
    },
    /// A retry attempt is about to wait and re-issue the request.
    Retry {
        path: String,
        /// The retry attempt number (1-indexed).
        attempt: u32,
        /// Delay before this retry attempt in milliseconds.
        delay_ms: u64,
        /// Error tag that triggered the retry.
        reason: String,
    },
}

/// Handler for request lifecycle events.
///
/// This is entirely optional -- clients work without an event handler.
///
/// # Example
///
/// ```
/// use rest_chain::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         match event {
///             Event::RequestStart { path, .. } => println!("[start] {}", path),
///             Event::RequestEnd { path, error, .. } => println!("[end] {} {:?}", path, error),
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: Event);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: Event) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
///
/// # Example
///
/// ```
/// use rest_chain::events::{Event, FnEventHandler};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: Event| {
///     if let Event::Retry { attempt, .. } = event {
///         println!("retry #{}", attempt);
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}
