//! Dispatch statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters accumulated across a cache's lifetime.
pub struct CacheStats {
    pub actions_dispatched: AtomicU64,
    pub actions_ignored: AtomicU64,
    pub requests_started: AtomicU64,
    pub requests_succeeded: AtomicU64,
    pub requests_failed: AtomicU64,
    pub stale_tolerated: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self {
            actions_dispatched: AtomicU64::new(0),
            actions_ignored: AtomicU64::new(0),
            requests_started: AtomicU64::new(0),
            requests_succeeded: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            stale_tolerated: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            actions_dispatched: self.actions_dispatched.load(Ordering::Relaxed),
            actions_ignored: self.actions_ignored.load(Ordering::Relaxed),
            requests_started: self.requests_started.load(Ordering::Relaxed),
            requests_succeeded: self.requests_succeeded.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            stale_tolerated: self.stale_tolerated.load(Ordering::Relaxed),
        }
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Clone, Debug)]
pub struct CacheStatsSnapshot {
    pub actions_dispatched: u64,
    pub actions_ignored: u64,
    pub requests_started: u64,
    pub requests_succeeded: u64,
    pub requests_failed: u64,
    pub stale_tolerated: u64,
}
