//! Timeline reads: home, public, hashtag and list.

use crate::params::require;
use derive_getters::Getters;
use serde_json::Value as JsonValue;
use tootline_client::{Dispatcher, Method, Query, RequestOptions};
use tootline_error::TootlineResult;

/// Pagination window for list-returning endpoints.
///
/// Mastodon paginates with opaque status IDs rather than offsets: `max_id`
/// walks backwards in time, `since_id` forwards.
///
/// # Examples
///
/// ```
/// use tootline_api::PageBuilder;
///
/// let page = PageBuilder::default().limit(5u32).build().unwrap();
/// assert_eq!(page.limit(), &Some(5));
/// ```
#[derive(Debug, Clone, Default, Getters, derive_builder::Builder)]
#[builder(default, setter(into, strip_option))]
pub struct Page {
    /// Maximum number of items to return; the server caps this at 40.
    limit: Option<u32>,
    /// Return results older than this ID.
    max_id: Option<String>,
    /// Return results newer than this ID.
    since_id: Option<String>,
}

impl Page {
    /// Render the window as query parameters, skipping unset fields.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(max_id) = &self.max_id {
            query.push(("max_id".to_string(), max_id.clone()));
        }
        if let Some(since_id) = &self.since_id {
            query.push(("since_id".to_string(), since_id.clone()));
        }
        query
    }
}

/// Operations on `/api/v1/timelines`.
pub struct Timelines<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Timelines<'a> {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// The authenticated user's home timeline.
    pub async fn home(&self, page: &Page) -> TootlineResult<JsonValue> {
        self.fetch("/api/v1/timelines/home", page.to_query()).await
    }

    /// The public timeline; `local_only` restricts it to this server.
    pub async fn public(&self, page: &Page, local_only: bool) -> TootlineResult<JsonValue> {
        let mut query = page.to_query();
        if local_only {
            query.push(("local".to_string(), "true".to_string()));
        }
        self.fetch("/api/v1/timelines/public", query).await
    }

    /// Statuses carrying a hashtag, given without the leading `#`.
    pub async fn hashtag(&self, tag: &str, page: &Page) -> TootlineResult<JsonValue> {
        let tag = require("Hashtag", tag)?.trim_start_matches('#');
        require("Hashtag", tag)?;
        self.fetch(&format!("/api/v1/timelines/tag/{tag}"), page.to_query())
            .await
    }

    /// Statuses from accounts in one of the user's lists.
    pub async fn list(&self, list_id: &str, page: &Page) -> TootlineResult<JsonValue> {
        let list_id = require("List ID", list_id)?;
        self.fetch(&format!("/api/v1/timelines/list/{list_id}"), page.to_query())
            .await
    }

    async fn fetch(&self, endpoint: &str, query: Query) -> TootlineResult<JsonValue> {
        self.dispatcher
            .dispatch(Method::GET, endpoint, None, query, RequestOptions::new())
            .await
    }
}
