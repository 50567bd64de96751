use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use serde::{Deserialize, Serialize};

/// Engine counters. All fields are atomic so clones can be shared freely.
#[derive(Clone, Default)]
pub struct EngineMetrics {
    pub completions_processed: Arc<AtomicU64>,
    pub recommendations_served: Arc<AtomicU64>,
    pub learning_paths_built: Arc<AtomicU64>,
    pub cache_hit_count: Arc<AtomicU64>,
    pub cache_miss_count: Arc<AtomicU64>,
    pub stale_resets: Arc<AtomicU64>,
    pub storage_errors: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub completions_processed: u64,
    pub recommendations_served: u64,
    pub learning_paths_built: u64,
    pub cache_hit_count: u64,
    pub cache_miss_count: u64,
    pub stale_resets: u64,
    pub storage_errors: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_completion(&self) {
        self.completions_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `n` recommendations handed back to a caller
    pub fn record_recommendations(&self, n: usize) {
        self.recommendations_served.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_learning_path(&self) {
        self.learning_paths_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hit_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_miss_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_reset(&self) {
        self.stale_resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_storage_error(&self) {
        self.storage_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            completions_processed: self.completions_processed.load(Ordering::Relaxed),
            recommendations_served: self.recommendations_served.load(Ordering::Relaxed),
            learning_paths_built: self.learning_paths_built.load(Ordering::Relaxed),
            cache_hit_count: self.cache_hit_count.load(Ordering::Relaxed),
            cache_miss_count: self.cache_miss_count.load(Ordering::Relaxed),
            stale_resets: self.stale_resets.load(Ordering::Relaxed),
            storage_errors: self.storage_errors.load(Ordering::Relaxed),
        }
    }
}
