//! Media upload and processing polls.

use crate::params::require;
use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tootline_client::{Dispatcher, Method, RequestOptions, Upload};
use tootline_error::{ApiError, ApiErrorKind, TootlineResult, ValidationError};
use tracing::{debug, instrument};

const POLL_ATTEMPTS: usize = 10;
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5);

/// Operations on the media endpoints.
pub struct Media<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Media<'a> {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Upload an attachment and wait for the server to finish processing it.
    ///
    /// `POST /api/v2/media` returns 202 while the file is still being
    /// transcoded; this polls the v1 status endpoint until a permanent URL
    /// appears, up to ten attempts five seconds apart. The returned
    /// attachment's `id` goes into [`StatusDraft::media_ids`].
    ///
    /// [`StatusDraft::media_ids`]: crate::StatusDraft
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name()))]
    pub async fn upload(&self, mut upload: Upload, description: Option<&str>) -> TootlineResult<JsonValue> {
        if let Some(description) = description
            && !description.trim().is_empty()
        {
            upload = upload.with_description(description.trim());
        }
        let options = RequestOptions::new().with_upload(upload);

        let attachment = self
            .dispatcher
            .dispatch(Method::POST, "/api/v2/media", None, Vec::new(), options)
            .await?;

        if url_ready(&attachment) {
            return Ok(attachment);
        }
        let id = attachment
            .get("id")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| ValidationError::new("Media upload response is missing an id"))?
            .to_string();
        self.wait_until_processed(&id, attachment).await
    }

    /// Fetch a single attachment's processing state.
    pub async fn get(&self, id: &str) -> TootlineResult<JsonValue> {
        let id = require("Media ID", id)?;
        self.dispatcher
            .dispatch(
                Method::GET,
                &format!("/api/v1/media/{id}"),
                None,
                Vec::new(),
                RequestOptions::new(),
            )
            .await
    }

    async fn wait_until_processed(
        &self,
        id: &str,
        mut latest: JsonValue,
    ) -> TootlineResult<JsonValue> {
        let poll_path = format!("/api/v1/media/{id}");
        for attempt in 1..=POLL_ATTEMPTS {
            sleep(POLL_INTERVAL).await;
            // Each poll must reach the server, not a cached 202 snapshot.
            self.dispatcher.invalidate_cached(&poll_path).await;
            latest = self.get(id).await?;
            if url_ready(&latest) {
                debug!(id, attempt, "media processing finished");
                return Ok(latest);
            }
        }
        Err(ApiError::new(ApiErrorKind::Api {
            status: 202,
            message: format!(
                "Media {id} was still processing after {POLL_ATTEMPTS} checks; try attaching it later"
            ),
        }))?
    }
}

/// An attachment is usable once the server has published its permanent URL.
fn url_ready(attachment: &JsonValue) -> bool {
    attachment
        .get("url")
        .and_then(JsonValue::as_str)
        .is_some_and(|url| !url.is_empty())
}
