//! Top-level client wiring the queue, cache and dispatcher together.

use std::sync::Arc;
use tokio::sync::Mutex;
use tootline_api::{
    Accounts, Bookmarks, Favourites, Media, Notifications, Search, Statuses, Timelines,
};
use tootline_cache::{ResponseCache, ResponseCacheConfig};
use tootline_client::{Credentials, Dispatcher};
use tootline_error::TootlineResult;
use tootline_queue::{QueueConfig, QueueStatus, RequestQueue};
use tracing::info;

/// A connected Mastodon client.
///
/// Owns the request queue, the response cache and the dispatcher, and hands
/// out per-resource operation handles. Clones share the same queue and cache,
/// so every call made through any clone is serialized against the same
/// rate-limit budget.
#[derive(Clone)]
pub struct Mastodon {
    dispatcher: Dispatcher,
    queue: Arc<RequestQueue>,
}

impl Mastodon {
    /// Connect with default queue and cache settings.
    ///
    /// Must be called within a tokio runtime; the queue spawns its worker
    /// tasks immediately.
    pub fn connect(credentials: Credentials) -> TootlineResult<Self> {
        Self::connect_with(credentials, QueueConfig::default(), ResponseCacheConfig::default())
    }

    /// Connect with explicit queue and cache configuration.
    pub fn connect_with(
        credentials: Credentials,
        queue_config: QueueConfig,
        cache_config: ResponseCacheConfig,
    ) -> TootlineResult<Self> {
        credentials.validate()?;
        let queue = Arc::new(RequestQueue::new(queue_config));
        let cache = Arc::new(Mutex::new(ResponseCache::new(cache_config)));
        let dispatcher = Dispatcher::new(credentials, Arc::clone(&queue), cache)?;
        info!(
            base_url = %dispatcher.credentials().base_url(),
            "connected Mastodon client"
        );
        Ok(Self { dispatcher, queue })
    }

    /// Status operations.
    pub fn statuses(&self) -> Statuses<'_> {
        Statuses::new(&self.dispatcher)
    }

    /// Account operations.
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(&self.dispatcher)
    }

    /// Timeline reads.
    pub fn timelines(&self) -> Timelines<'_> {
        Timelines::new(&self.dispatcher)
    }

    /// Media upload and polling.
    pub fn media(&self) -> Media<'_> {
        Media::new(&self.dispatcher)
    }

    /// The user's favourites list.
    pub fn favourites(&self) -> Favourites<'_> {
        Favourites::new(&self.dispatcher)
    }

    /// The user's bookmarks list.
    pub fn bookmarks(&self) -> Bookmarks<'_> {
        Bookmarks::new(&self.dispatcher)
    }

    /// Notification reads and dismissals.
    pub fn notifications(&self) -> Notifications<'_> {
        Notifications::new(&self.dispatcher)
    }

    /// Full-text search.
    pub fn search(&self) -> Search<'_> {
        Search::new(&self.dispatcher)
    }

    /// Escape hatch for endpoints without a dedicated operation module.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Queue depth, budget and processing state.
    pub async fn status(&self) -> QueueStatus {
        self.queue.status().await
    }

    /// Stop the queue's background tasks and discard pending work.
    pub async fn shutdown(&self) {
        self.queue.shutdown().await;
    }
}

impl std::fmt::Debug for Mastodon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mastodon")
            .field("base_url", self.dispatcher.credentials().base_url())
            .finish_non_exhaustive()
    }
}
