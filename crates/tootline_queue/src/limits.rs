//! Shared rate-limit state, updated from upstream response headers.

use derive_getters::Getters;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex, Notify};
use tracing::debug;

/// Point-in-time view of the rate-limit budget.
#[derive(Debug, Clone, Getters)]
pub struct RateLimitSnapshot {
    /// Calls remaining before the next reset.
    remaining: u32,
    /// Reset instant as epoch seconds.
    reset_epoch: u64,
    /// Calls made since the last reset.
    requests_made: u32,
}

#[derive(Debug)]
struct State {
    remaining: u32,
    reset_epoch: u64,
    requests_made: u32,
    /// Per-window call limit, seeded from the default budget and overwritten
    /// by the `x-ratelimit-limit` header once a response reports one.
    window_limit: u32,
}

/// Process-shared rate-limit budget for one upstream server.
///
/// Mutated by the dispatcher after each response (from the
/// `x-ratelimit-remaining` / `x-ratelimit-reset` headers, or synthetically on
/// a 429) and consulted by the queue worker before every task. Invariant:
/// `remaining` never goes below zero, and while it is zero no task is
/// dispatched until the reset instant has passed.
///
/// Cloning is cheap; all clones share the same state.
#[derive(Debug, Clone)]
pub struct RateLimits {
    state: Arc<Mutex<State>>,
    wake: Arc<Notify>,
}

impl RateLimits {
    /// Create a fresh budget assuming `default_budget` calls are available.
    pub fn new(default_budget: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                remaining: default_budget,
                reset_epoch: 0,
                requests_made: 0,
                window_limit: default_budget,
            })),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Update the budget from upstream headers.
    ///
    /// `reset_epoch` is the reset instant in epoch seconds; `limit` is the
    /// per-window call limit when the response reported one, which replaces
    /// the assumed window size. When the reset lies in the future the
    /// requests-made counter is re-derived from the reported remainder. A
    /// positive remainder wakes an idle queue worker.
    pub async fn update(&self, remaining: u32, reset_epoch: u64, limit: Option<u32>) {
        {
            let mut state = self.state.lock().await;
            if let Some(limit) = limit {
                state.window_limit = limit;
            }
            state.remaining = remaining;
            state.reset_epoch = reset_epoch;
            if reset_epoch > epoch_now() {
                state.requests_made = state.window_limit.saturating_sub(remaining);
            }
            debug!(remaining, reset_epoch, "updated rate limit state");
        }
        if remaining > 0 {
            self.wake.notify_one();
        }
    }

    /// Consume one call from the budget.
    ///
    /// Called by the dispatcher when a network request is actually performed;
    /// cache hits never debit.
    pub async fn debit(&self) {
        let mut state = self.state.lock().await;
        if state.remaining > 0 {
            state.remaining -= 1;
            state.requests_made += 1;
        }
    }

    /// How long dispatch must wait before the next call, if at all.
    ///
    /// Returns None when budget remains or the reset instant is already in
    /// the past (a stale reset causes no wait).
    pub async fn wait_duration(&self) -> Option<Duration> {
        let state = self.state.lock().await;
        if state.remaining > 0 {
            return None;
        }
        let target = UNIX_EPOCH + Duration::from_secs(state.reset_epoch);
        target
            .duration_since(SystemTime::now())
            .ok()
            .filter(|d| !d.is_zero())
    }

    /// Restore the full window budget after waiting out a reset.
    pub async fn restore(&self) {
        let mut state = self.state.lock().await;
        state.remaining = state.window_limit;
        state.requests_made = 0;
        debug!(remaining = state.remaining, "restored rate limit budget");
    }

    /// Read-only view of the current budget.
    pub async fn snapshot(&self) -> RateLimitSnapshot {
        let state = self.state.lock().await;
        RateLimitSnapshot {
            remaining: state.remaining,
            reset_epoch: state.reset_epoch,
            requests_made: state.requests_made,
        }
    }

    /// The notifier used to wake the queue worker, shared so header updates
    /// can resume a suspended loop.
    pub(crate) fn waker(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }
}

/// Current time in epoch seconds.
pub(crate) fn epoch_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
