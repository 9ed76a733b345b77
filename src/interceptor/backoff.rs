//! Exponential backoff with jitter for the [`Retry`](super::Retry) interceptor.
//!
//! [`BackoffConfig`] decides which failures are retried and how long to wait
//! between attempts. Use [`BackoffConfig::none()`] to disable retries and
//! [`BackoffConfig::standard()`] for typical remote APIs.
//!
//! A server may ask for a specific wait with `Retry-After` (delta seconds);
//! when [`BackoffConfig::honor_retry_after`] is set that value replaces the
//! computed delay, still capped at `max_delay`.

use crate::error::ErrorKind;
use crate::response::Response;
use std::time::Duration;

/// Configuration for retry with exponential backoff and jitter.
///
/// # Example
///
/// ```
/// use rest_chain::interceptor::BackoffConfig;
///
/// let none = BackoffConfig::none();
/// assert_eq!(none.max_retries, 0);
///
/// let standard = BackoffConfig::standard();
/// assert_eq!(standard.max_retries, 3);
/// ```
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Maximum number of retries after the first attempt. Default: 0.
    pub max_retries: u32,

    /// Delay before the first retry. Default: 250 ms.
    pub initial_delay: Duration,

    /// Multiplier applied to the delay after each retry. Default: 2.0.
    pub multiplier: f64,

    /// Upper bound on any single delay. Default: 30 seconds.
    pub max_delay: Duration,

    /// Jitter strategy. Default: Full.
    pub jitter: JitterStrategy,

    /// Status codes of `http-error` failures that are retried.
    /// Default: `[408, 429, 500, 502, 503, 504]`.
    pub retryable_statuses: Vec<u16>,

    /// Whether `loaderror` failures are retried. Default: `true`.
    pub retry_load_errors: bool,

    /// Use the failed response's `Retry-After` header when present. Default: `true`.
    pub honor_retry_after: bool,
}

/// Jitter strategy to spread retries from many clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterStrategy {
    /// Delay is exactly the calculated value.
    None,

    /// Random value in `[0, calculated_delay]`.
    Full,

    /// `calculated_delay/2 + random in [0, calculated_delay/2]`.
    Equal,
}

impl BackoffConfig {
    /// No retry.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::standard()
        }
    }

    /// 3 retries, 250ms initial, 2x multiplier, 30s max, full jitter.
    pub fn standard() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(250),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            jitter: JitterStrategy::Full,
            retryable_statuses: vec![408, 429, 500, 502, 503, 504],
            retry_load_errors: true,
            honor_retry_after: true,
        }
    }

    /// 6 retries, 100ms initial, 60s max. For background sync.
    pub fn aggressive() -> Self {
        Self {
            max_retries: 6,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
            ..Self::standard()
        }
    }

    /// 2 retries, 100ms initial, 1.5x multiplier, 2s max, equal jitter.
    /// For requests a user is waiting on.
    pub fn interactive() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            multiplier: 1.5,
            max_delay: Duration::from_secs(2),
            jitter: JitterStrategy::Equal,
            ..Self::standard()
        }
    }

    /// Whether a failure of this kind should be retried.
    pub fn is_retryable(&self, kind: &ErrorKind) -> bool {
        match kind {
            ErrorKind::HttpStatus(status) => self.retryable_statuses.contains(status),
            ErrorKind::LoadError => self.retry_load_errors,
            _ => false,
        }
    }

    /// Delay before retry N (0-indexed).
    ///
    /// `initial_delay * multiplier^attempt`, capped at `max_delay`, then jittered.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let ceiling = self.max_delay.as_secs_f64();
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let secs = (self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent)).min(ceiling);

        let secs = match self.jitter {
            JitterStrategy::None => secs,
            JitterStrategy::Full => secs * fastrand::f64(),
            JitterStrategy::Equal => secs * (0.5 + fastrand::f64() / 2.0),
        };
        Duration::from_secs_f64(secs)
    }

    /// How long to wait after `failed` before retry N.
    ///
    /// Prefers the server's `Retry-After` when allowed, otherwise the
    /// exponential schedule.
    pub fn delay_after(&self, failed: &Response, attempt: u32) -> Duration {
        match retry_after(failed).filter(|_| self.honor_retry_after) {
            Some(wait) => wait.min(self.max_delay),
            None => self.delay_for_attempt(attempt),
        }
    }
}

/// Parse a `Retry-After` header given in delta seconds.
///
/// HTTP-date values are not supported and yield `None`.
pub fn retry_after(response: &Response) -> Option<Duration> {
    let value = response.headers.get("retry-after")?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::RawResponse;

    fn fixed(max_delay: Duration) -> BackoffConfig {
        BackoffConfig {
            max_retries: 5,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay,
            jitter: JitterStrategy::None,
            retryable_statuses: vec![503],
            retry_load_errors: true,
            honor_retry_after: true,
        }
    }

    #[test]
    fn test_backoff_delay_exponential() {
        let config = fixed(Duration::from_secs(60));
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_delay_capped_at_max() {
        let config = fixed(Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_jitter_full_in_range() {
        let config = BackoffConfig {
            jitter: JitterStrategy::Full,
            ..fixed(Duration::from_secs(60))
        };
        for _ in 0..100 {
            assert!(config.delay_for_attempt(1) <= Duration::from_secs(2));
        }
    }

    #[test]
    fn test_backoff_jitter_equal_lower_bound() {
        let config = BackoffConfig {
            jitter: JitterStrategy::Equal,
            ..fixed(Duration::from_secs(60))
        };
        for _ in 0..100 {
            let d = config.delay_for_attempt(1);
            assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(2), "{:?}", d);
        }
    }

    #[test]
    fn test_retryable_kinds() {
        let config = BackoffConfig::standard();
        assert!(config.is_retryable(&ErrorKind::LoadError));
        assert!(config.is_retryable(&ErrorKind::HttpStatus(503)));
        assert_eq!(config.retryable_statuses, vec![408, 429, 500, 502, 503, 504]);
        assert!(!config.is_retryable(&ErrorKind::HttpStatus(400)));
        assert!(!config.is_retryable(&ErrorKind::Aborted));
        assert!(!config.is_retryable(&ErrorKind::Precanceled));
        assert!(!config.is_retryable(&ErrorKind::TransportUnavailable));
    }

    #[test]
    fn test_presets() {
        assert_eq!(BackoffConfig::none().max_retries, 0);
        assert_eq!(BackoffConfig::aggressive().max_retries, 6);
        let interactive = BackoffConfig::interactive();
        assert_eq!(interactive.max_retries, 2);
        assert_eq!(interactive.max_delay, Duration::from_secs(2));
        assert_eq!(interactive.jitter, JitterStrategy::Equal);
    }

    fn failed_with(headers: &[(&str, &str)]) -> Response {
        let mut raw = RawResponse::new(503, "Service Unavailable", "");
        for (name, value) in headers {
            raw = raw.with_header(*name, *value);
        }
        Response::from_raw(Request::new("/"), raw)
    }

    #[test]
    fn test_retry_after_seconds() {
        assert_eq!(
            retry_after(&failed_with(&[("Retry-After", " 7 ")])),
            Some(Duration::from_secs(7))
        );
        assert_eq!(
            retry_after(&failed_with(&[("Retry-After", "Wed, 21 Oct 2015 07:28:00 GMT")])),
            None
        );
        assert_eq!(retry_after(&failed_with(&[])), None);
    }

    #[test]
    fn test_delay_after_prefers_server_hint() {
        let config = fixed(Duration::from_secs(5));
        let hinted = failed_with(&[("Retry-After", "3")]);
        assert_eq!(config.delay_after(&hinted, 0), Duration::from_secs(3));

        let too_long = failed_with(&[("Retry-After", "3600")]);
        assert_eq!(config.delay_after(&too_long, 0), Duration::from_secs(5));

        let ignoring = BackoffConfig {
            honor_retry_after: false,
            ..fixed(Duration::from_secs(5))
        };
        assert_eq!(ignoring.delay_after(&hinted, 2), Duration::from_secs(4));
        assert_eq!(config.delay_after(&failed_with(&[]), 1), Duration::from_secs(2));
    }
}
