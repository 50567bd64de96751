use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::profile::{Difficulty, LearnerProfile, Pace};
use crate::selector::Recommendation;
use crate::skills::{LevelDistribution, SkillGraph, SkillLevel};

pub const TOP_NEXT_SKILLS: usize = 5;
pub const MAX_IMPROVEMENT_AREAS: usize = 5;
pub const TOP_RECOMMENDATIONS: usize = 3;

/// Outcome of one attempt at a module, as reported by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub completed: bool,
    /// Score in [0, 100]; clamped by the engine
    pub score: f64,
    pub time_taken_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStats {
    pub total_attempted: u32,
    pub total_completed: u32,
    pub completion_rate: f64,
    pub failure_rate: f64,
    pub average_completion_time_seconds: f64,
    pub learning_pace: Pace,
    pub preferred_difficulty: Difficulty,
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl From<&LearnerProfile> for ProfileStats {
    fn from(profile: &LearnerProfile) -> Self {
        ProfileStats {
            total_attempted: profile.total_attempted,
            total_completed: profile.total_completed,
            completion_rate: profile.completion_rate(),
            failure_rate: profile.failure_rate,
            average_completion_time_seconds: profile.average_completion_time_seconds,
            learning_pace: profile.learning_pace,
            preferred_difficulty: profile.preferred_difficulty,
            last_activity_at: profile.last_activity_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelShare {
    pub level: SkillLevel,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSummary {
    pub total_skills: usize,
    pub levels: Vec<LevelShare>,
    pub mastery_percentage: f64,
}

impl From<&LevelDistribution> for SkillSummary {
    fn from(dist: &LevelDistribution) -> Self {
        SkillSummary {
            total_skills: dist.total,
            levels: SkillLevel::ALL
                .iter()
                .map(|&level| LevelShare {
                    level,
                    count: dist.count(level),
                    percentage: dist.percentage(level),
                })
                .collect(),
            mastery_percentage: dist.mastery_percentage(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementArea {
    pub skill: String,
    pub proficiency: f64,
    pub practice_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveAnalysis {
    pub learner_id: String,
    pub profile: ProfileStats,
    pub skills: SkillSummary,
    pub recommended_next_skills: Vec<String>,
    pub improvement_areas: Vec<ImprovementArea>,
    pub top_recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}

impl ComprehensiveAnalysis {
    /// Assemble the analysis from already-loaded learner state and a ranked
    /// recommendation list.
    pub fn build(profile: &LearnerProfile, graph: &SkillGraph, mut ranked: Vec<Recommendation>) -> Self {
        let mut next = graph.recommended_next_skills();
        next.truncate(TOP_NEXT_SKILLS);

        let improvement_areas = graph
            .struggling_skills(MAX_IMPROVEMENT_AREAS)
            .into_iter()
            .filter_map(|name| {
                graph.get(&name).map(|node| ImprovementArea {
                    skill: name.clone(),
                    proficiency: node.proficiency,
                    practice_count: node.practice_count,
                })
            })
            .collect();

        ranked.truncate(TOP_RECOMMENDATIONS);

        ComprehensiveAnalysis {
            learner_id: profile.learner_id.clone(),
            profile: ProfileStats::from(profile),
            skills: SkillSummary::from(&graph.level_distribution()),
            recommended_next_skills: next,
            improvement_areas,
            top_recommendations: ranked,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillUpdate {
    pub skill: String,
    pub before: f64,
    pub after: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub module_id: String,
    pub completed: bool,
    pub score: f64,
    pub time_taken_seconds: f64,
    pub skills_updated: Vec<SkillUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionAnalysis {
    pub completion: CompletionSummary,
    pub analysis: ComprehensiveAnalysis,
}
