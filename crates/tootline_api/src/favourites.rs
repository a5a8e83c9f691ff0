//! The authenticated user's favourites list.

use crate::Page;
use serde_json::Value as JsonValue;
use tootline_client::{Dispatcher, Method, RequestOptions};
use tootline_error::TootlineResult;

/// Operations on `/api/v1/favourites`.
pub struct Favourites<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Favourites<'a> {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Statuses the user has favourited, newest first.
    pub async fn list(&self, page: &Page) -> TootlineResult<JsonValue> {
        self.dispatcher
            .dispatch(
                Method::GET,
                "/api/v1/favourites",
                None,
                page.to_query(),
                RequestOptions::new(),
            )
            .await
    }
}
