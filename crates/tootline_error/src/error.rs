//! Top-level error wrapper types.

use crate::{ApiError, ConfigError, JsonError, QueueError, RetryableError, ValidationError};

/// The foundation error enum for the Tootline workspace.
///
/// # Examples
///
/// ```
/// use tootline_error::{ApiError, ApiErrorKind, TootlineError};
///
/// let api_err = ApiError::new(ApiErrorKind::Auth);
/// let err: TootlineError = api_err.into();
/// assert!(format!("{}", err).contains("Authentication failed"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TootlineErrorKind {
    /// Mastodon API error
    #[from(ApiError)]
    Api(ApiError),
    /// Missing or incomplete credentials
    #[from(ConfigError)]
    Config(ConfigError),
    /// Request queue admission or settlement failure
    #[from(QueueError)]
    Queue(QueueError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Caller-supplied input failed validation
    #[from(ValidationError)]
    Validation(ValidationError),
}

/// Tootline error with kind discrimination.
///
/// # Examples
///
/// ```
/// use tootline_error::{ConfigError, TootlineResult};
///
/// fn might_fail() -> TootlineResult<()> {
///     Err(ConfigError::new("No access token"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Tootline Error: {}", _0)]
pub struct TootlineError(Box<TootlineErrorKind>);

impl TootlineError {
    /// Create a new error from a kind.
    pub fn new(kind: TootlineErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TootlineErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to TootlineErrorKind
impl<T> From<T> for TootlineError
where
    T: Into<TootlineErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for TootlineError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            TootlineErrorKind::Api(api) => api.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for Tootline operations.
///
/// # Examples
///
/// ```
/// use tootline_error::{TootlineResult, ValidationError};
///
/// fn check_status_text(text: &str) -> TootlineResult<()> {
///     if text.is_empty() {
///         Err(ValidationError::new("Status text is required"))?
///     }
///     Ok(())
/// }
/// ```
pub type TootlineResult<T> = std::result::Result<T, TootlineError>;
