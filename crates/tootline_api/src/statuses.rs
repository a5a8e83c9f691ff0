//! Status operations: create, fetch, delete and the interaction toggles.

use crate::params::{require, sanitize};
use chrono::{DateTime, Duration, Utc};
use derive_getters::Getters;
use serde_json::{Map, Value as JsonValue, json};
use sha2::{Digest, Sha256};
use tootline_client::{Dispatcher, Method, RequestOptions};
use tootline_error::{JsonError, TootlineResult, ValidationError};
use tootline_text::{MAX_STATUS_LENGTH, truncate_preserving_urls};
use tracing::instrument;

const ALLOWED_VISIBILITIES: [&str; 4] = ["direct", "private", "unlisted", "public"];
const MAX_MEDIA_ATTACHMENTS: usize = 4;
const SPOILER_TEXT_LIMIT: usize = 100;
const LANGUAGE_CODE_LIMIT: usize = 2;
const MIN_SCHEDULE_LEAD_MINUTES: i64 = 5;

/// A status waiting to be posted.
///
/// Build one with [`StatusDraftBuilder`]; only `status` (or media) is
/// required.
///
/// # Examples
///
/// ```
/// use tootline_api::StatusDraftBuilder;
///
/// let draft = StatusDraftBuilder::default()
///     .status("Hello, fediverse!")
///     .visibility("unlisted")
///     .build()
///     .unwrap();
/// assert_eq!(draft.status(), "Hello, fediverse!");
/// ```
#[derive(Debug, Clone, Default, Getters, derive_builder::Builder)]
#[builder(default, setter(into, strip_option))]
pub struct StatusDraft {
    /// Status text; truncated to Mastodon's effective 500-char limit with
    /// URLs preserved whole.
    status: String,
    /// Visibility: `direct`, `private`, `unlisted` or `public`.
    visibility: Option<String>,
    /// Up to four attachment IDs from the media endpoints.
    media_ids: Vec<String>,
    /// ID of the status being replied to.
    in_reply_to_id: Option<String>,
    /// Mark media as sensitive.
    sensitive: Option<bool>,
    /// Content warning text, capped at 100 characters.
    spoiler_text: Option<String>,
    /// ISO 639-1 language code.
    language: Option<String>,
    /// Publish later; must be at least five minutes out.
    scheduled_at: Option<DateTime<Utc>>,
}

/// Operations on `/api/v1/statuses`.
pub struct Statuses<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Statuses<'a> {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Post a status.
    ///
    /// The text is run through URL-preserving truncation so the effective
    /// length never exceeds the server limit, and the request carries an
    /// `Idempotency-Key` derived from the payload to prevent duplicate
    /// submissions on retry.
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &StatusDraft) -> TootlineResult<JsonValue> {
        let body = build_create_body(draft)?;
        let options = RequestOptions::new().with_header("Idempotency-Key", idempotency_key(&body)?);
        self.dispatcher
            .dispatch(Method::POST, "/api/v1/statuses", Some(body), Vec::new(), options)
            .await
    }

    /// Fetch a status by ID.
    pub async fn get(&self, id: &str) -> TootlineResult<JsonValue> {
        let id = require("Status ID", id)?;
        self.dispatcher
            .dispatch(
                Method::GET,
                &format!("/api/v1/statuses/{id}"),
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await
    }

    /// Delete a status and drop any cached reads of it.
    pub async fn delete(&self, id: &str) -> TootlineResult<JsonValue> {
        let id = require("Status ID", id)?;
        let path = format!("/api/v1/statuses/{id}");
        let deleted = self
            .dispatcher
            .dispatch(Method::DELETE, &path, None, Vec::new(), RequestOptions::new())
            .await?;
        self.dispatcher.invalidate_cached(&path).await;
        Ok(deleted)
    }

    /// Favourite a status.
    pub async fn favourite(&self, id: &str) -> TootlineResult<JsonValue> {
        self.interact(id, "favourite").await
    }

    /// Undo a favourite.
    pub async fn unfavourite(&self, id: &str) -> TootlineResult<JsonValue> {
        self.interact(id, "unfavourite").await
    }

    /// Boost (reblog) a status.
    pub async fn boost(&self, id: &str) -> TootlineResult<JsonValue> {
        self.interact(id, "reblog").await
    }

    /// Undo a boost.
    pub async fn unboost(&self, id: &str) -> TootlineResult<JsonValue> {
        self.interact(id, "unreblog").await
    }

    /// Bookmark a status.
    pub async fn bookmark(&self, id: &str) -> TootlineResult<JsonValue> {
        self.interact(id, "bookmark").await
    }

    /// Remove a bookmark.
    pub async fn unbookmark(&self, id: &str) -> TootlineResult<JsonValue> {
        self.interact(id, "unbookmark").await
    }

    // All interaction toggles share one shape: POST to a verb suffix, then
    // invalidate cached reads of the status.
    async fn interact(&self, id: &str, verb: &str) -> TootlineResult<JsonValue> {
        let id = require("Status ID", id)?;
        let status_path = format!("/api/v1/statuses/{id}");
        let result = self
            .dispatcher
            .dispatch(
                Method::POST,
                &format!("{status_path}/{verb}"),
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        self.dispatcher.invalidate_cached(&status_path).await;
        Ok(result)
    }
}

fn build_create_body(draft: &StatusDraft) -> TootlineResult<JsonValue> {
    let text = draft.status().trim();
    if text.is_empty() && draft.media_ids().is_empty() {
        return Err(ValidationError::new(
            "Either status text or media attachments must be provided",
        )
        .into());
    }

    let mut body = Map::new();
    body.insert(
        "status".to_string(),
        json!(truncate_preserving_urls(text, MAX_STATUS_LENGTH)),
    );

    if !draft.media_ids().is_empty() {
        if draft.media_ids().len() > MAX_MEDIA_ATTACHMENTS {
            return Err(ValidationError::new(format!(
                "Maximum of {MAX_MEDIA_ATTACHMENTS} media attachments allowed"
            ))
            .into());
        }
        let ids: Vec<String> = draft
            .media_ids()
            .iter()
            .map(|id| id.trim().to_string())
            .collect();
        body.insert("media_ids".to_string(), json!(ids));
    }

    if let Some(reply_to) = draft.in_reply_to_id() {
        body.insert("in_reply_to_id".to_string(), json!(require("Reply target ID", reply_to)?));
    }
    if let Some(sensitive) = draft.sensitive() {
        body.insert("sensitive".to_string(), json!(sensitive));
    }
    if let Some(spoiler) = draft.spoiler_text() {
        body.insert(
            "spoiler_text".to_string(),
            json!(sanitize(spoiler, SPOILER_TEXT_LIMIT)),
        );
    }

    if let Some(visibility) = draft.visibility() {
        let visibility = visibility.trim();
        if !ALLOWED_VISIBILITIES.contains(&visibility) {
            return Err(ValidationError::new(format!(
                "Invalid visibility value {visibility:?}; allowed values: {}",
                ALLOWED_VISIBILITIES.join(", ")
            ))
            .into());
        }
        body.insert("visibility".to_string(), json!(visibility));
    }

    if let Some(scheduled_at) = draft.scheduled_at() {
        let earliest = Utc::now() + Duration::minutes(MIN_SCHEDULE_LEAD_MINUTES);
        if *scheduled_at <= earliest {
            return Err(ValidationError::new(
                "Scheduled time must be at least 5 minutes in the future",
            )
            .into());
        }
        body.insert("scheduled_at".to_string(), json!(scheduled_at.to_rfc3339()));
    }

    if let Some(language) = draft.language() {
        body.insert(
            "language".to_string(),
            json!(sanitize(language, LANGUAGE_CODE_LIMIT)),
        );
    }

    Ok(JsonValue::Object(body))
}

/// SHA-256 over the serialized payload, so retried submissions of the same
/// draft never double-post.
fn idempotency_key(body: &JsonValue) -> TootlineResult<String> {
    let payload = serde_json::to_vec(body)
        .map_err(|e| JsonError::new(format!("failed to serialize status payload: {e}")))?;
    let mut hasher = Sha256::new();
    hasher.update(&payload);
    Ok(format!("{:x}", hasher.finalize()))
}
