//! Mastodon API error types and retry classification.

/// Failure conditions surfaced by the Mastodon REST API.
///
/// The HTTP status code is the discriminant: connection-level failures carry
/// no status and become [`ApiErrorKind::Network`], while everything else maps
/// onto the upstream code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ApiErrorKind {
    /// Transport-level failure: timeout, refused or reset connection.
    #[display("Network error: unable to connect to the Mastodon server: {}", _0)]
    Network(String),
    /// HTTP 401.
    #[display("Authentication failed: please reconnect your Mastodon credentials")]
    Auth,
    /// HTTP 403.
    #[display(
        "Insufficient OAuth2 scope: ensure your Mastodon app and credentials have all required permissions for this operation"
    )]
    Permission,
    /// HTTP 404, naming the resource derived from the request path.
    #[display("The requested {} was not found; verify the ID or handle is correct", resource)]
    NotFound {
        /// Singularized final path segment of the failed request.
        resource: String,
    },
    /// HTTP 429.
    #[display("Rate limit exceeded; retry after {} seconds", retry_after_secs)]
    RateLimit {
        /// Seconds reported by the `Retry-After` header.
        retry_after_secs: u64,
    },
    /// HTTP 502, 503 or 504.
    #[display("Mastodon API is temporarily unavailable ({}); please try again later", status)]
    Unavailable {
        /// The upstream status code.
        status: u16,
    },
    /// Any other upstream status, message preserved verbatim.
    #[display("Mastodon API error ({}): {}", status, message)]
    Api {
        /// The upstream status code.
        status: u16,
        /// The upstream response body.
        message: String,
    },
}

impl ApiErrorKind {
    /// Check if this error type should be retried with backoff.
    ///
    /// Rate limits are excluded: a 429 is requeued once behind the shared
    /// rate-limit wait rather than retried blindly.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiErrorKind::Network(_) | ApiErrorKind::Unavailable { .. }
        )
    }
}

/// API error with source location tracking.
///
/// # Examples
///
/// ```
/// use tootline_error::{ApiError, ApiErrorKind};
///
/// let err = ApiError::new(ApiErrorKind::NotFound {
///     resource: "favourite".to_string(),
/// });
/// assert!(format!("{}", err).contains("favourite"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("API Error: {} at line {} in {}", kind, line, file)]
pub struct ApiError {
    /// The kind of error that occurred
    pub kind: ApiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ApiError {
    /// Create a new ApiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// Transient failures (transport errors, 5xx gateway responses) report
/// themselves as retryable along with the backoff parameters the dispatcher
/// should apply. Permanent failures (401, 403, 404) return false.
///
/// # Examples
///
/// ```
/// use tootline_error::{ApiError, ApiErrorKind, RetryableError};
///
/// let err = ApiError::new(ApiErrorKind::Unavailable { status: 503 });
/// assert!(err.is_retryable());
///
/// let (base_delay_ms, max_retries, max_delay_secs) = err.retry_strategy_params();
/// assert_eq!(base_delay_ms, 3000);
/// assert_eq!(max_retries, 5);
/// assert_eq!(max_delay_secs, 30);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(base_delay_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (3000, 5, 30)
    }
}

impl RetryableError for ApiError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
