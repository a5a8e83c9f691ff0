//! Full-text search across accounts, hashtags and statuses.

use crate::params::require;
use serde_json::Value as JsonValue;
use tootline_client::{Dispatcher, Method, Query, RequestOptions};
use tootline_error::TootlineResult;

/// Restrict a search to one result category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SearchType {
    /// Only account results.
    #[display("accounts")]
    Accounts,
    /// Only hashtag results.
    #[display("hashtags")]
    Hashtags,
    /// Only status results.
    #[display("statuses")]
    Statuses,
}

/// Operations on `/api/v2/search`.
pub struct Search<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Search<'a> {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Search the server. An unset `search_type` returns all three result
    /// categories; `resolve` asks the server to look up remote resources.
    pub async fn query(
        &self,
        term: &str,
        search_type: Option<SearchType>,
        resolve: bool,
        limit: Option<u32>,
    ) -> TootlineResult<JsonValue> {
        let term = require("Search term", term)?;
        let mut query: Query = vec![("q".to_string(), term.to_string())];
        if let Some(search_type) = search_type {
            query.push(("type".to_string(), search_type.to_string()));
        }
        if resolve {
            query.push(("resolve".to_string(), "true".to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        self.dispatcher
            .dispatch(Method::GET, "/api/v2/search", None, query, RequestOptions::new())
            .await
    }
}
