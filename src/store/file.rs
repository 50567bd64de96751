use std::path::{Path, PathBuf};
use serde::{de::DeserializeOwned, Serialize};
use crate::profile::LearnerProfile;
use crate::skills::SkillGraph;
use crate::store::{LearnerStore, StoreError};

const PROFILE_FILE: &str = "profile.json";
const SKILL_GRAPH_FILE: &str = "skill_graph.json";

/// One directory per learner under `root`, holding a JSON document for the
/// profile and one for the skill graph.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        JsonFileStore { root: root.into() }
    }

    /// Store rooted in the configured data directory.
    pub fn from_config(config: &crate::config::EngineConfig) -> Self {
        Self::new(config.data_dir().join("learners"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn learner_dir(&self, learner_id: &str) -> PathBuf {
        self.root.join(sanitize_id(learner_id))
    }

    async fn read_json<T: DeserializeOwned>(&self, path: PathBuf) -> Result<Option<T>, StoreError> {
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| StoreError::Json {
                what: path.display().to_string(),
                source: e,
            })
    }

    async fn write_json<T: Serialize>(&self, path: PathBuf, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io { path: parent.to_path_buf(), source: e })?;
        }
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::Json {
                what: path.display().to_string(),
                source: e,
            })?;

        // Write to a sibling temp file first so readers never see a partial document
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::Io { path: tmp.clone(), source: e })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Io { path: path.clone(), source: e })?;

        tracing::debug!(path = ?path, "Wrote learner document");
        Ok(())
    }
}

/// Keep learner ids from escaping the store root.
fn sanitize_id(learner_id: &str) -> String {
    let cleaned: String = learner_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

impl LearnerStore for JsonFileStore {
    async fn load_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>, StoreError> {
        self.read_json(self.learner_dir(learner_id).join(PROFILE_FILE)).await
    }

    async fn save_profile(&self, profile: &LearnerProfile) -> Result<(), StoreError> {
        self.write_json(self.learner_dir(&profile.learner_id).join(PROFILE_FILE), profile).await
    }

    async fn load_skill_graph(&self, learner_id: &str) -> Result<Option<SkillGraph>, StoreError> {
        self.read_json(self.learner_dir(learner_id).join(SKILL_GRAPH_FILE)).await
    }

    async fn save_skill_graph(&self, graph: &SkillGraph) -> Result<(), StoreError> {
        self.write_json(self.learner_dir(&graph.learner_id).join(SKILL_GRAPH_FILE), graph).await
    }
}
