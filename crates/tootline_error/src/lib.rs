//! Error types for the Tootline library.
//!
//! This crate provides the foundation error types used throughout the Tootline
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use tootline_error::{ConfigError, TootlineResult};
//!
//! fn resolve_token() -> TootlineResult<String> {
//!     Err(ConfigError::new("No access token found in credentials"))?
//! }
//!
//! match resolve_token() {
//!     Ok(token) => println!("Got: {}", token),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod json;
mod queue;
mod validation;

pub use api::{ApiError, ApiErrorKind, RetryableError};
pub use config::ConfigError;
pub use error::{TootlineError, TootlineErrorKind, TootlineResult};
pub use json::JsonError;
pub use queue::{QueueError, QueueErrorKind};
pub use validation::ValidationError;
