//! Account operations: credentials, lookups and follow management.

use crate::params::require;
use serde_json::Value as JsonValue;
use tootline_client::{Dispatcher, Method, Query, RequestOptions};
use tootline_error::TootlineResult;

/// Operations on `/api/v1/accounts`.
pub struct Accounts<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Accounts<'a> {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// The account behind the access token. Useful as a connectivity and
    /// credential check.
    pub async fn verify_credentials(&self) -> TootlineResult<JsonValue> {
        self.dispatcher
            .dispatch(
                Method::GET,
                "/api/v1/accounts/verify_credentials",
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await
    }

    /// Fetch an account by ID.
    pub async fn get(&self, id: &str) -> TootlineResult<JsonValue> {
        let id = require("Account ID", id)?;
        self.dispatcher
            .dispatch(
                Method::GET,
                &format!("/api/v1/accounts/{id}"),
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await
    }

    /// Follow an account.
    pub async fn follow(&self, id: &str) -> TootlineResult<JsonValue> {
        self.toggle(id, "follow").await
    }

    /// Unfollow an account.
    pub async fn unfollow(&self, id: &str) -> TootlineResult<JsonValue> {
        self.toggle(id, "unfollow").await
    }

    /// Relationship records between the authenticated user and `ids`.
    pub async fn relationships(&self, ids: &[&str]) -> TootlineResult<JsonValue> {
        let query: Query = ids
            .iter()
            .filter(|id| !id.trim().is_empty())
            .map(|id| ("id[]".to_string(), id.to_string()))
            .collect();
        self.dispatcher
            .dispatch(
                Method::GET,
                "/api/v1/accounts/relationships",
                None,
                query,
                RequestOptions::new(),
            )
            .await
    }

    /// Search accounts by name or handle.
    pub async fn search(&self, term: &str, limit: Option<u32>) -> TootlineResult<JsonValue> {
        let term = require("Search term", term)?;
        let mut query: Query = vec![("q".to_string(), term.to_string())];
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        self.dispatcher
            .dispatch(
                Method::GET,
                "/api/v1/accounts/search",
                None,
                query,
                RequestOptions::new(),
            )
            .await
    }

    async fn toggle(&self, id: &str, verb: &str) -> TootlineResult<JsonValue> {
        let id = require("Account ID", id)?;
        let result = self
            .dispatcher
            .dispatch(
                Method::POST,
                &format!("/api/v1/accounts/{id}/{verb}"),
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        // Relationship reads are stale after a follow change.
        self.dispatcher
            .invalidate_cached("/api/v1/accounts/relationships")
            .await;
        Ok(result)
    }
}
