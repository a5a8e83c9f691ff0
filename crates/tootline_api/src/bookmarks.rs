//! The authenticated user's bookmarks list.

use crate::Page;
use serde_json::Value as JsonValue;
use tootline_client::{Dispatcher, Method, RequestOptions};
use tootline_error::TootlineResult;

/// Operations on `/api/v1/bookmarks`.
pub struct Bookmarks<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Bookmarks<'a> {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Statuses the user has bookmarked, newest first.
    pub async fn list(&self, page: &Page) -> TootlineResult<JsonValue> {
        self.dispatcher
            .dispatch(
                Method::GET,
                "/api/v1/bookmarks",
                None,
                page.to_query(),
                RequestOptions::new(),
            )
            .await
    }
}
