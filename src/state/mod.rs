//! Engine-wide shared state: the per-learner single-writer boundary and the
//! snapshot cache in front of the learner store.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use lru::LruCache;
use parking_lot::Mutex;
use crate::profile::LearnerProfile;
use crate::skills::SkillGraph;

/// Lock entries kept before idle ones are swept on the next acquire.
pub const DEFAULT_PRUNE_THRESHOLD: usize = 256;

type LockMap = HashMap<String, Arc<tokio::sync::Mutex<()>>>;

/// Async mutex per learner id. Every read-modify-write of a learner's
/// documents happens while holding that learner's guard.
///
/// Entries nobody holds or waits on are dropped once the map reaches the
/// prune threshold, so the map never exceeds it by more than the number of
/// learners currently in flight.
#[derive(Clone)]
pub struct LearnerLocks {
    locks: Arc<Mutex<LockMap>>,
    prune_threshold: usize,
}

impl Default for LearnerLocks {
    fn default() -> Self {
        Self::with_prune_threshold(DEFAULT_PRUNE_THRESHOLD)
    }
}

impl LearnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prune_threshold(threshold: usize) -> Self {
        LearnerLocks {
            locks: Arc::new(Mutex::new(HashMap::new())),
            prune_threshold: threshold.max(1),
        }
    }

    pub fn prune_threshold(&self) -> usize {
        self.prune_threshold
    }

    /// Wait for exclusive access to `learner_id`.
    pub async fn acquire(&self, learner_id: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            if locks.len() >= self.prune_threshold && !locks.contains_key(learner_id) {
                let removed = sweep_idle(&mut locks);
                if removed > 0 {
                    tracing::debug!(removed, remaining = locks.len(), "Pruned idle learner locks");
                }
            }
            locks
                .entry(learner_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop lock entries nobody is holding or waiting on.
    pub fn prune(&self) -> usize {
        sweep_idle(&mut self.locks.lock())
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}

// The map holds one strong reference; any other is a guard or a waiter.
fn sweep_idle(locks: &mut LockMap) -> usize {
    let before = locks.len();
    locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    before - locks.len()
}

/// Bounded write-through cache of learner documents.
///
/// Entries are only written after a successful store save, so a cached
/// snapshot never runs ahead of what is persisted.
#[derive(Clone)]
pub struct LearnerCache {
    profiles: Arc<Mutex<LruCache<String, LearnerProfile>>>,
    graphs: Arc<Mutex<LruCache<String, SkillGraph>>>,
}

impl LearnerCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        LearnerCache {
            profiles: Arc::new(Mutex::new(LruCache::new(capacity))),
            graphs: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn profile(&self, learner_id: &str) -> Option<LearnerProfile> {
        self.profiles.lock().get(learner_id).cloned()
    }

    pub fn put_profile(&self, profile: LearnerProfile) {
        self.profiles.lock().put(profile.learner_id.clone(), profile);
    }

    pub fn graph(&self, learner_id: &str) -> Option<SkillGraph> {
        self.graphs.lock().get(learner_id).cloned()
    }

    pub fn put_graph(&self, graph: SkillGraph) {
        self.graphs.lock().put(graph.learner_id.clone(), graph);
    }

    pub fn invalidate(&self, learner_id: &str) {
        self.profiles.lock().pop(learner_id);
        self.graphs.lock().pop(learner_id);
    }
}
