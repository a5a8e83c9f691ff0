//! Notification reads and dismissals.

use crate::Page;
use crate::params::require;
use serde_json::Value as JsonValue;
use tootline_client::{Dispatcher, Method, Query, RequestOptions};
use tootline_error::TootlineResult;

/// Operations on `/api/v1/notifications`.
pub struct Notifications<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Notifications<'a> {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Notifications for the authenticated user. `types` filters to the
    /// given notification kinds, e.g. `mention` or `follow`.
    pub async fn list(&self, page: &Page, types: &[&str]) -> TootlineResult<JsonValue> {
        let mut query: Query = page.to_query();
        for kind in types {
            if !kind.trim().is_empty() {
                query.push(("types[]".to_string(), kind.trim().to_string()));
            }
        }
        self.dispatcher
            .dispatch(
                Method::GET,
                "/api/v1/notifications",
                None,
                query,
                RequestOptions::new(),
            )
            .await
    }

    /// Fetch a single notification.
    pub async fn get(&self, id: &str) -> TootlineResult<JsonValue> {
        let id = require("Notification ID", id)?;
        self.dispatcher
            .dispatch(
                Method::GET,
                &format!("/api/v1/notifications/{id}"),
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await
    }

    /// Dismiss a single notification.
    pub async fn dismiss(&self, id: &str) -> TootlineResult<JsonValue> {
        let id = require("Notification ID", id)?;
        let result = self
            .dispatcher
            .dispatch(
                Method::POST,
                &format!("/api/v1/notifications/{id}/dismiss"),
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        self.dispatcher.invalidate_cached("/api/v1/notifications").await;
        Ok(result)
    }

    /// Dismiss every notification.
    pub async fn clear(&self) -> TootlineResult<JsonValue> {
        let result = self
            .dispatcher
            .dispatch(
                Method::POST,
                "/api/v1/notifications/clear",
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        self.dispatcher.invalidate_cached("/api/v1/notifications").await;
        Ok(result)
    }
}
