//! Learner persistence boundary.
//!
//! The engine reads a whole profile or skill graph, mutates it in memory and
//! writes it back. Callers of a [`LearnerStore`] are expected to serialize
//! writes per learner; [`crate::state::LearnerLocks`] does that for the engine.

pub mod file;
pub mod memory;

use std::future::Future;
use std::path::PathBuf;
use crate::profile::LearnerProfile;
use crate::skills::SkillGraph;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error for {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store backend error: {0}")]
    Backend(String),
}

pub trait LearnerStore: Send + Sync {
    fn load_profile(&self, learner_id: &str)
        -> impl Future<Output = Result<Option<LearnerProfile>, StoreError>> + Send;

    fn save_profile(&self, profile: &LearnerProfile)
        -> impl Future<Output = Result<(), StoreError>> + Send;

    fn load_skill_graph(&self, learner_id: &str)
        -> impl Future<Output = Result<Option<SkillGraph>, StoreError>> + Send;

    fn save_skill_graph(&self, graph: &SkillGraph)
        -> impl Future<Output = Result<(), StoreError>> + Send;
}
