//! Serialized, rate-limit-aware request scheduling.
//!
//! Every outbound call to a Mastodon server funnels through a
//! [`RequestQueue`]: a FIFO scheduler with a single consumer task, so at most
//! one request is ever in flight. The queue enforces the shared
//! [`RateLimits`] budget reported by upstream response headers, bounds its
//! depth to protect the process from unbounded growth, and periodically
//! expires work that has waited too long.
//!
//! Queues are plain constructor-built values with an explicit lifecycle:
//! create one with [`RequestQueue::new`], share it behind an `Arc`, and call
//! [`RequestQueue::shutdown`] when done. Independent queues (for example one
//! per Mastodon account) coexist freely in one process.

mod config;
mod limits;
mod queue;

pub use config::{QueueConfig, QueueConfigBuilder};
pub use limits::{RateLimitSnapshot, RateLimits};
pub use queue::{QueueStatus, RequestQueue, TaskFuture, TaskResult};
