use std::sync::Arc;
use tokio::sync::Mutex;
use tootline_cache::{ResponseCache, ResponseCacheConfig};
use tootline_client::{Credentials, Dispatcher};
use tootline_queue::{QueueConfig, RequestQueue};

/// Dispatcher wired to a mock server, with no inter-request spacing so tests
/// run fast.
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub queue: Arc<RequestQueue>,
}

impl Harness {
    pub fn new(base_url: &str) -> Self {
        let config = QueueConfig::default().with_inter_request_delay_ms(0);
        let queue = Arc::new(RequestQueue::new(config));
        let cache = Arc::new(Mutex::new(ResponseCache::new(ResponseCacheConfig::default())));
        let dispatcher = Dispatcher::new(
            Credentials::new(base_url, "test-token"),
            Arc::clone(&queue),
            cache,
        )
        .unwrap();
        Self { dispatcher, queue }
    }

    pub async fn shutdown(&self) {
        self.queue.shutdown().await;
    }
}
