use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::profile::{Difficulty, LearnerProfile, Pace};
use crate::selector::Recommendation;
use crate::skills::SkillGraph;

pub const MAX_SUGGESTIONS: usize = 3;
/// Days without activity after which a welcome-back suggestion is shown.
pub const LAPSED_AFTER_DAYS: i64 = 7;

/// Optional steering supplied with an adaptive recommendation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationContext {
    #[serde(default)]
    pub goal: Option<String>,
    /// Keep modules within one level of this difficulty
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub max_duration_secs: Option<f64>,
}

impl RecommendationContext {
    pub fn is_empty(&self) -> bool {
        self.goal.as_deref().map(str::trim).map_or(true, str::is_empty)
            && self.difficulty.is_none()
            && self.max_duration_secs.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveRecommendations {
    pub learner_id: String,
    pub recommendations: Vec<Recommendation>,
    /// False when no filter was requested or the filters matched nothing
    pub filters_applied: bool,
    pub suggestions: Vec<String>,
    pub context: RecommendationContext,
}

/// Narrow `base` by the context filters. An empty result falls back to `base`.
pub fn apply_context(base: Vec<Recommendation>, context: &RecommendationContext) -> (Vec<Recommendation>, bool) {
    if context.is_empty() {
        return (base, false);
    }

    let goal = context
        .goal
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty());

    let filtered: Vec<Recommendation> = base
        .iter()
        .filter(|r| goal.map_or(true, |g| r.module.mentions(g)))
        .filter(|r| {
            context.difficulty.map_or(true, |d| {
                (r.module.difficulty_level() as i32 - d.level() as i32).abs() <= 1
            })
        })
        .filter(|r| {
            context
                .max_duration_secs
                .map_or(true, |max| r.module.duration_secs() <= max)
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        tracing::debug!(context = ?context, "Context filters matched nothing, keeping base set");
        (base, false)
    } else {
        (filtered, true)
    }
}

/// Short coaching hints, in fixed priority order: pace, mastery,
/// completion rate, then inactivity.
pub fn suggestions(profile: &LearnerProfile, graph: &SkillGraph, now: DateTime<Utc>) -> Vec<String> {
    let mut out = Vec::new();

    match profile.learning_pace {
        Pace::Slow => out.push(
            "Shorter modules can help you keep momentum between sessions.".to_string(),
        ),
        Pace::Fast => out.push(
            "You're moving quickly; try a more challenging module next.".to_string(),
        ),
        Pace::Normal => {}
    }

    let mastery = graph.level_distribution().mastery_percentage();
    if mastery < 20.0 {
        out.push("Focus on foundational skills before branching out.".to_string());
    } else if mastery > 70.0 {
        out.push("You've mastered most of your skills; explore an advanced topic.".to_string());
    }

    if profile.total_attempted > 0 && profile.completion_rate() < 50.0 {
        out.push("Try easier modules to build a streak of completions.".to_string());
    }

    match profile.last_activity_at {
        Some(last) if last < now - Duration::days(LAPSED_AFTER_DAYS) => {
            out.push("Welcome back! A quick review module is a good way to ease in.".to_string());
        }
        None => out.push("Start with a short module so we can calibrate your level.".to_string()),
        Some(_) => {}
    }

    out.truncate(MAX_SUGGESTIONS);
    out
}
