//! Per-resource operation modules for the Mastodon REST API.
//!
//! Each module is a thin mapping from a `(resource, operation)` pair to an
//! HTTP method, path and parameter set, dispatched through
//! [`tootline_client::Dispatcher`]. Rate limiting, caching and retries are
//! handled there; these modules only validate input and shape requests.

mod accounts;
mod bookmarks;
mod favourites;
mod media;
mod notifications;
mod params;
mod search;
mod statuses;
mod timelines;

pub use accounts::Accounts;
pub use bookmarks::Bookmarks;
pub use favourites::Favourites;
pub use media::Media;
pub use notifications::Notifications;
pub use params::{require, sanitize};
pub use search::{Search, SearchType};
pub use statuses::{StatusDraft, StatusDraftBuilder, Statuses};
pub use timelines::{Page, PageBuilder, Timelines};
