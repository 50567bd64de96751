pub mod scorer;
pub mod path;

use serde::{Deserialize, Serialize};
use crate::modules::Module;
use crate::profile::LearnerProfile;
use crate::skills::SkillGraph;

pub use path::{build_learning_path, LearningPath, PathStep, DEFAULT_MAX_MODULES};
pub use scorer::{score, ScoreBreakdown, ScoringContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub module: Module,
    pub score: f64,
    pub reasoning: String,
    pub breakdown: ScoreBreakdown,
}

/// Score every module, drop non-positive scores and return the best `limit`
/// in descending order. Equal scores keep catalog order.
pub fn rank(
    modules: &[Module],
    profile: &LearnerProfile,
    graph: &SkillGraph,
    gap_threshold: f64,
    limit: usize,
) -> Vec<Recommendation> {
    let ctx = ScoringContext::new(profile, graph, gap_threshold);
    let mut ranked: Vec<Recommendation> = modules
        .iter()
        .filter_map(|module| {
            let breakdown = ctx.breakdown(module);
            if breakdown.total <= 0.0 {
                return None;
            }
            Some(Recommendation {
                module: module.clone(),
                score: breakdown.total,
                reasoning: scorer::reasoning(module, profile, &breakdown),
                breakdown,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(limit);

    tracing::debug!(
        learner_id = %profile.learner_id,
        candidates = modules.len(),
        returned = ranked.len(),
        "Ranked modules"
    );
    ranked
}

/// Keep recommendations whose module mentions `goal`. Falls back to the
/// unfiltered list when nothing matches.
pub fn filter_by_goal(recommendations: Vec<Recommendation>, goal: &str) -> Vec<Recommendation> {
    let matching: Vec<Recommendation> = recommendations
        .iter()
        .filter(|r| r.module.mentions(goal))
        .cloned()
        .collect();
    if matching.is_empty() {
        tracing::debug!(goal = %goal, "No recommendation matches goal, keeping all");
        recommendations
    } else {
        matching
    }
}

/// Pick the single best module from a ranked pool, optionally steered by `goal`.
pub fn select_next(pool: Vec<Recommendation>, goal: Option<&str>) -> Option<Module> {
    let pool = match goal {
        Some(goal) if !goal.trim().is_empty() => filter_by_goal(pool, goal.trim()),
        _ => pool,
    };
    pool.into_iter().next().map(|r| r.module)
}
