//! Rate-limit-aware Mastodon API client.
//!
//! All outbound calls for one server funnel through a single FIFO
//! [`RequestQueue`], which keeps exactly one request in flight, honors the
//! server's `X-RateLimit-*` headers, and spaces requests out. GET responses
//! land in a TTL-and-LRU [`ResponseCache`]; mutations invalidate the stale
//! reads they affect. Transient failures retry with exponential backoff, and
//! a first 429 re-enters the queue behind the advertised reset.
//!
//! [`Mastodon`] wires the pieces together:
//!
//! ```rust,no_run
//! use tootline::{Credentials, Mastodon, StatusDraftBuilder};
//!
//! # async fn run() -> tootline::TootlineResult<()> {
//! let mastodon = Mastodon::connect(Credentials::new(
//!     "https://mastodon.example",
//!     "access-token",
//! ))?;
//!
//! let draft = StatusDraftBuilder::default()
//!     .status("Hello from tootline! https://example.com/hello")
//!     .build()
//!     .map_err(|e| tootline::ValidationError::new(e.to_string()))?;
//! let posted = mastodon.statuses().create(&draft).await?;
//! println!("posted {}", posted["id"]);
//!
//! mastodon.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod mastodon;
mod telemetry;

pub use mastodon::Mastodon;
pub use telemetry::init_tracing;

pub use tootline_api::{
    Accounts, Bookmarks, Favourites, Media, Notifications, Page, PageBuilder, Search, SearchType,
    StatusDraft, StatusDraftBuilder, Statuses, Timelines,
};
pub use tootline_cache::{ResponseCache, ResponseCacheConfig};
pub use tootline_client::{Credentials, Dispatcher, Method, Query, RequestOptions, Upload};
pub use tootline_error::{
    ApiError, ApiErrorKind, ConfigError, JsonError, QueueError, QueueErrorKind, RetryableError,
    TootlineError, TootlineErrorKind, TootlineResult, ValidationError,
};
pub use tootline_queue::{QueueConfig, QueueStatus, RateLimits, RequestQueue};
pub use tootline_text::{
    MAX_STATUS_LENGTH, URL_RESERVED_LENGTH, UrlSpan, extract_urls, mastodon_length,
    truncate_preserving_urls,
};
