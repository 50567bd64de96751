use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use crate::profile::LearnerProfile;
use crate::skills::SkillGraph;
use crate::store::{LearnerStore, StoreError};

/// In-process store. Clones share the same underlying maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<RwLock<HashMap<String, LearnerProfile>>>,
    graphs: Arc<RwLock<HashMap<String, SkillGraph>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn graph_count(&self) -> usize {
        self.graphs.read().len()
    }
}

impl LearnerStore for MemoryStore {
    async fn load_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>, StoreError> {
        Ok(self.profiles.read().get(learner_id).cloned())
    }

    async fn save_profile(&self, profile: &LearnerProfile) -> Result<(), StoreError> {
        self.profiles
            .write()
            .insert(profile.learner_id.clone(), profile.clone());
        Ok(())
    }

    async fn load_skill_graph(&self, learner_id: &str) -> Result<Option<SkillGraph>, StoreError> {
        Ok(self.graphs.read().get(learner_id).cloned())
    }

    async fn save_skill_graph(&self, graph: &SkillGraph) -> Result<(), StoreError> {
        self.graphs
            .write()
            .insert(graph.learner_id.clone(), graph.clone());
        Ok(())
    }
}
