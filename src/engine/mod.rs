//! Orchestration layer. Loads learner state, applies events, runs the
//! selector against the catalog and persists results.
//!
//! Every operation that may write a learner's documents holds that learner's
//! lock from load to save, so concurrent completions for one learner are
//! applied one after another instead of overwriting each other.

pub mod analysis;
pub mod adaptive;

use std::path::Path;
use chrono::Utc;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::modules::{JsonDirCatalog, Module, ModuleCatalog};
use crate::profile::LearnerProfile;
use crate::proficiency::clamp_proficiency;
use crate::selector::{self, LearningPath, Recommendation};
use crate::skills::SkillGraph;
use crate::state::{LearnerCache, LearnerLocks};
use crate::store::{JsonFileStore, LearnerStore, StoreError};

pub use adaptive::{AdaptiveRecommendations, RecommendationContext};
pub use analysis::{
    CompletionAnalysis, CompletionSummary, ComprehensiveAnalysis, Performance, SkillUpdate,
};

pub struct Engine<S, C> {
    store: S,
    catalog: C,
    config: EngineConfig,
    locks: LearnerLocks,
    cache: LearnerCache,
    metrics: EngineMetrics,
}

impl Engine<JsonFileStore, JsonDirCatalog> {
    /// File-backed engine rooted in the configured data directory.
    pub fn from_config(config: EngineConfig) -> Self {
        let store = JsonFileStore::from_config(&config);
        let catalog = JsonDirCatalog::from_config(&config);
        Engine::new(store, catalog, config)
    }

    /// File-backed engine configured from a TOML file at `path`.
    pub fn from_config_file(path: &Path) -> Result<Self, EngineError> {
        let config = EngineConfig::from_file(path)?;
        tracing::info!(path = ?path, "Loaded engine config");
        Ok(Self::from_config(config))
    }
}

impl<S: LearnerStore, C: ModuleCatalog> Engine<S, C> {
    pub fn new(store: S, catalog: C, config: EngineConfig) -> Self {
        let cache = LearnerCache::new(config.learner_cache_capacity);
        Engine {
            store,
            catalog,
            config,
            locks: LearnerLocks::new(),
            cache,
            metrics: EngineMetrics::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn locks(&self) -> &LearnerLocks {
        &self.locks
    }

    /// The learner's profile, created with zeroed statistics on first access.
    pub async fn get_learner_profile(&self, learner_id: &str) -> Result<LearnerProfile, EngineError> {
        let _guard = self.locks.acquire(learner_id).await;
        self.load_or_create_profile(learner_id).await
    }

    /// The learner's skill tree, seeded with the default curriculum on first access.
    pub async fn get_skill_tree(&self, learner_id: &str) -> Result<SkillGraph, EngineError> {
        let _guard = self.locks.acquire(learner_id).await;
        self.load_or_create_graph(learner_id).await
    }

    /// Track a new skill for the learner. Existing skills are left as they are.
    pub async fn add_skill(
        &self,
        learner_id: &str,
        name: &str,
        prerequisites: &[String],
    ) -> Result<bool, EngineError> {
        let _guard = self.locks.acquire(learner_id).await;
        let mut graph = self.load_or_create_graph(learner_id).await?;
        let inserted = graph.add_skill(name, prerequisites);
        if inserted {
            graph.updated_at = Utc::now();
            self.save_graph(&graph).await?;
        }
        Ok(inserted)
    }

    /// Apply a finished attempt: update the profile, practise every skill the
    /// module exercises when it was completed, and return a fresh analysis.
    pub async fn process_completion(
        &self,
        learner_id: &str,
        module: &Module,
        performance: Performance,
    ) -> Result<CompletionAnalysis, EngineError> {
        let score = clamp_proficiency(performance.score);
        let time_taken = performance.time_taken_seconds.max(0.0);

        let guard = self.locks.acquire(learner_id).await;
        let mut profile = self.load_or_create_profile(learner_id).await?;
        let mut graph = self.load_or_create_graph(learner_id).await?;

        profile.record_interaction(&module.id, performance.completed, time_taken, Some(score));

        let mut skills_updated = Vec::new();
        if performance.completed && !module.skills.is_empty() {
            for skill in &module.skills {
                let before = graph.proficiency(skill).unwrap_or(0.0);
                let after = graph
                    .record_practice_weighted(skill, score, self.config.proficiency_weight)
                    .proficiency;
                skills_updated.push(SkillUpdate { skill: skill.clone(), before, after });
            }
        }

        self.save_profile(&profile).await?;
        if !skills_updated.is_empty() {
            self.save_graph(&graph).await?;
        }
        drop(guard);

        self.metrics.record_completion();
        tracing::info!(
            learner_id = %learner_id,
            module_id = %module.id,
            completed = performance.completed,
            score = score,
            skills_updated = skills_updated.len(),
            "Processed module completion"
        );

        let modules = self.list_modules().await?;
        let ranked = self.rank(&modules, &profile, &graph, analysis::TOP_RECOMMENDATIONS);
        Ok(CompletionAnalysis {
            completion: CompletionSummary {
                module_id: module.id.clone(),
                completed: performance.completed,
                score,
                time_taken_seconds: time_taken,
                skills_updated,
            },
            analysis: ComprehensiveAnalysis::build(&profile, &graph, ranked),
        })
    }

    pub async fn comprehensive_analysis(&self, learner_id: &str) -> Result<ComprehensiveAnalysis, EngineError> {
        let (profile, graph) = self.learner_state(learner_id).await?;
        let modules = self.list_modules().await?;
        let ranked = self.rank(&modules, &profile, &graph, analysis::TOP_RECOMMENDATIONS);
        Ok(ComprehensiveAnalysis::build(&profile, &graph, ranked))
    }

    /// Ranked modules with a positive score, best first, at most `limit`.
    pub async fn recommend(&self, learner_id: &str, limit: usize) -> Result<Vec<Recommendation>, EngineError> {
        let (profile, graph) = self.learner_state(learner_id).await?;
        let modules = self.list_modules().await?;
        let ranked = self.rank(&modules, &profile, &graph, limit);
        self.metrics.record_recommendations(ranked.len());
        Ok(ranked)
    }

    /// Best next module from the top of the ranking, steered by `goal` if given.
    pub async fn select_next(&self, learner_id: &str, goal: Option<&str>) -> Result<Option<Module>, EngineError> {
        let pool = self.recommend(learner_id, self.config.recommendation_pool).await?;
        let chosen = selector::select_next(pool, goal);
        tracing::debug!(
            learner_id = %learner_id,
            goal = ?goal,
            module_id = ?chosen.as_ref().map(|m| m.id.as_str()),
            "Selected next module"
        );
        Ok(chosen)
    }

    pub async fn build_learning_path(
        &self,
        learner_id: &str,
        target_skills: &[String],
        max_modules: usize,
    ) -> Result<LearningPath, EngineError> {
        let (_, graph) = self.learner_state(learner_id).await?;
        let modules = self.list_modules().await?;
        let path = selector::build_learning_path(&graph, &modules, target_skills, max_modules);
        self.metrics.record_learning_path();
        tracing::info!(
            learner_id = %learner_id,
            targets = ?target_skills,
            steps = path.steps.len(),
            uncovered = path.uncovered_skills.len(),
            "Built learning path"
        );
        Ok(path)
    }

    pub async fn adaptive_recommendations(
        &self,
        learner_id: &str,
        context: RecommendationContext,
    ) -> Result<AdaptiveRecommendations, EngineError> {
        let (profile, graph) = self.learner_state(learner_id).await?;
        let modules = self.list_modules().await?;
        let base = self.rank(&modules, &profile, &graph, self.config.recommendation_pool);
        let (recommendations, filters_applied) = adaptive::apply_context(base, &context);
        let suggestions = adaptive::suggestions(&profile, &graph, Utc::now());
        self.metrics.record_recommendations(recommendations.len());

        Ok(AdaptiveRecommendations {
            learner_id: learner_id.to_string(),
            recommendations,
            filters_applied,
            suggestions,
            context,
        })
    }

    /// Reset the learner's statistics if they have been inactive longer than
    /// the configured window. Preferred difficulty survives the reset.
    pub async fn reset_if_stale(&self, learner_id: &str) -> Result<LearnerProfile, EngineError> {
        let _guard = self.locks.acquire(learner_id).await;
        let mut profile = self.load_or_create_profile(learner_id).await?;
        if !profile.is_stale(self.config.stale_after_days) {
            return Ok(profile);
        }
        profile.reset();
        self.save_profile(&profile).await?;
        self.metrics.record_stale_reset();
        tracing::info!(
            learner_id = %learner_id,
            stale_after_days = self.config.stale_after_days,
            "Reset stale learner profile"
        );
        Ok(profile)
    }

    fn rank(&self, modules: &[Module], profile: &LearnerProfile, graph: &SkillGraph, limit: usize) -> Vec<Recommendation> {
        selector::rank(modules, profile, graph, self.config.gap_threshold, limit)
    }

    /// Snapshot of both learner documents, creating them if needed.
    async fn learner_state(&self, learner_id: &str) -> Result<(LearnerProfile, SkillGraph), EngineError> {
        let _guard = self.locks.acquire(learner_id).await;
        let profile = self.load_or_create_profile(learner_id).await?;
        let graph = self.load_or_create_graph(learner_id).await?;
        Ok((profile, graph))
    }

    async fn list_modules(&self) -> Result<Vec<Module>, EngineError> {
        self.catalog
            .list_modules()
            .await
            .map_err(|e| self.storage_failure(e, None))
    }

    // The two loaders below expect the caller to hold the learner's lock.

    async fn load_or_create_profile(&self, learner_id: &str) -> Result<LearnerProfile, EngineError> {
        if let Some(profile) = self.cache.profile(learner_id) {
            self.metrics.record_cache_hit();
            return Ok(profile);
        }
        self.metrics.record_cache_miss();

        let loaded = self
            .store
            .load_profile(learner_id)
            .await
            .map_err(|e| self.storage_failure(e, Some(learner_id)))?;
        match loaded {
            Some(profile) => {
                self.cache.put_profile(profile.clone());
                Ok(profile)
            }
            None => {
                let profile = LearnerProfile::new(learner_id);
                self.save_profile(&profile).await?;
                tracing::info!(learner_id = %learner_id, "Created learner profile");
                Ok(profile)
            }
        }
    }

    async fn load_or_create_graph(&self, learner_id: &str) -> Result<SkillGraph, EngineError> {
        if let Some(graph) = self.cache.graph(learner_id) {
            self.metrics.record_cache_hit();
            return Ok(graph);
        }
        self.metrics.record_cache_miss();

        let loaded = self
            .store
            .load_skill_graph(learner_id)
            .await
            .map_err(|e| self.storage_failure(e, Some(learner_id)))?;
        match loaded {
            Some(graph) => {
                self.cache.put_graph(graph.clone());
                Ok(graph)
            }
            None => {
                let graph = SkillGraph::seeded(learner_id);
                self.save_graph(&graph).await?;
                tracing::info!(
                    learner_id = %learner_id,
                    skills = graph.len(),
                    "Seeded skill tree with default curriculum"
                );
                Ok(graph)
            }
        }
    }

    async fn save_profile(&self, profile: &LearnerProfile) -> Result<(), EngineError> {
        self.store
            .save_profile(profile)
            .await
            .map_err(|e| self.storage_failure(e, Some(&profile.learner_id)))?;
        self.cache.put_profile(profile.clone());
        Ok(())
    }

    async fn save_graph(&self, graph: &SkillGraph) -> Result<(), EngineError> {
        self.store
            .save_skill_graph(graph)
            .await
            .map_err(|e| self.storage_failure(e, Some(&graph.learner_id)))?;
        self.cache.put_graph(graph.clone());
        Ok(())
    }

    fn storage_failure(&self, err: StoreError, learner_id: Option<&str>) -> EngineError {
        self.metrics.record_storage_error();
        tracing::error!(learner_id = ?learner_id, error = %err, "Storage operation failed");
        let err = EngineError::from(err);
        match learner_id {
            Some(id) => err.with_learner(id),
            None => err,
        }
    }
}
