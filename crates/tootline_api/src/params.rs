//! Parameter validation helpers shared by the operation modules.

use tootline_error::{TootlineResult, ValidationError};

/// Fail with a validation error when a required parameter is empty.
///
/// # Examples
///
/// ```
/// use tootline_api::require;
///
/// assert!(require("Status ID", "12345").is_ok());
/// assert!(require("Status ID", "  ").is_err());
/// ```
pub fn require<'a>(name: &str, value: &'a str) -> TootlineResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{name} is required")).into());
    }
    Ok(value)
}

/// Trim surrounding whitespace and cap a string parameter at `max_chars`.
///
/// # Examples
///
/// ```
/// use tootline_api::sanitize;
///
/// assert_eq!(sanitize("  en  ", 2), "en");
/// assert_eq!(sanitize("english", 2), "en");
/// ```
pub fn sanitize(value: &str, max_chars: usize) -> String {
    value.trim().chars().take(max_chars).collect()
}
