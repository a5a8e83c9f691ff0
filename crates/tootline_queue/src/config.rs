//! Queue tuning knobs.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`crate::RequestQueue`].
///
/// The defaults reproduce the behavior Mastodon servers expect from a
/// well-behaved client: a 300-call budget per window, 100 ms between
/// requests, and stale queued work dropped after a minute.
#[derive(
    Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct QueueConfig {
    /// Maximum number of pending tasks before admission is rejected.
    #[serde(default = "default_max_depth")]
    max_depth: usize,

    /// Seconds a task may wait in the queue before it is expired.
    #[serde(default = "default_task_expiry_secs")]
    task_expiry_secs: u64,

    /// Seconds between sweeps for expired queued tasks.
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,

    /// Milliseconds of spacing inserted between consecutive requests.
    #[serde(default = "default_inter_request_delay_ms")]
    inter_request_delay_ms: u64,

    /// Rate-limit budget assumed after a reset when no headers have been
    /// seen yet (Mastodon's default per-window limit).
    #[serde(default = "default_budget")]
    default_budget: u32,
}

fn default_max_depth() -> usize {
    1000
}

fn default_task_expiry_secs() -> u64 {
    60
}

fn default_sweep_interval_secs() -> u64 {
    30
}

fn default_inter_request_delay_ms() -> u64 {
    100
}

fn default_budget() -> u32 {
    300
}

impl QueueConfig {
    /// Task expiry window as a [`Duration`].
    pub fn task_expiry(&self) -> Duration {
        Duration::from_secs(self.task_expiry_secs)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Inter-request spacing as a [`Duration`].
    pub fn inter_request_delay(&self) -> Duration {
        Duration::from_millis(self.inter_request_delay_ms)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            task_expiry_secs: default_task_expiry_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            inter_request_delay_ms: default_inter_request_delay_ms(),
            default_budget: default_budget(),
        }
    }
}
