//! Module scoring.
//!
//! A module's score is the sum of four independent terms, floored at zero.
//! Each term is exposed on its own so it can be inspected in isolation.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::modules::Module;
use crate::profile::{LearnerProfile, Pace};
use crate::skills::SkillGraph;

const SWEET_SPOT_BONUS: f64 = 1.0;
const TOO_EASY_PENALTY: f64 = -0.5;
const TOO_HARD_PENALTY: f64 = -0.3;
const EXPLORATION_BONUS: f64 = 0.5;
const DIFFICULTY_MATCH_BONUS: f64 = 1.0;
const DIFFICULTY_MISMATCH_RATE: f64 = 0.3;
const PACE_MATCH_BONUS: f64 = 0.5;
const GAP_BONUS: f64 = 0.3;
const READY_SKILL_BONUS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub readiness: f64,
    pub difficulty_match: f64,
    pub pace_match: f64,
    pub gap_bonus: f64,
    pub gap_count: usize,
    pub total: f64,
}

/// Precomputed per-learner inputs shared across every module being scored.
pub struct ScoringContext<'a> {
    pub profile: &'a LearnerProfile,
    pub graph: &'a SkillGraph,
    pub gap_threshold: f64,
    ready: HashSet<String>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(profile: &'a LearnerProfile, graph: &'a SkillGraph, gap_threshold: f64) -> Self {
        ScoringContext {
            profile,
            graph,
            gap_threshold,
            ready: graph.recommended_next_skills().into_iter().collect(),
        }
    }

    pub fn breakdown(&self, module: &Module) -> ScoreBreakdown {
        if module.skills.is_empty() {
            return ScoreBreakdown::default();
        }
        let readiness = readiness_term(module, self.graph);
        let difficulty_match = difficulty_term(module, self.profile);
        let pace_match = pace_term(module, self.profile.learning_pace);
        // Gap and ready bonuses count distinct skills
        let mut seen = HashSet::new();
        let distinct: Vec<String> = module
            .skills
            .iter()
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect();
        let gap_count = self.graph.gaps(&distinct, self.gap_threshold).len();
        let ready_count = distinct.iter().filter(|s| self.ready.contains(*s)).count();
        let gap_bonus = GAP_BONUS * gap_count as f64 + READY_SKILL_BONUS * ready_count as f64;

        let total = (readiness + difficulty_match + pace_match + gap_bonus).max(0.0);
        ScoreBreakdown {
            readiness,
            difficulty_match,
            pace_match,
            gap_bonus,
            gap_count,
            total,
        }
    }

    pub fn score(&self, module: &Module) -> f64 {
        self.breakdown(module).total
    }
}

/// Score one module against a learner. Zero for a module with no skills.
pub fn score(module: &Module, profile: &LearnerProfile, graph: &SkillGraph, gap_threshold: f64) -> f64 {
    ScoringContext::new(profile, graph, gap_threshold).score(module)
}

/// Average per-skill readiness: skills in the 25-75 band are worth
/// advancing, near-mastered or far-below skills are penalised, untracked
/// skills earn an exploration bonus.
pub fn readiness_term(module: &Module, graph: &SkillGraph) -> f64 {
    if module.skills.is_empty() {
        return 0.0;
    }
    let sum: f64 = module
        .skills
        .iter()
        .map(|skill| match graph.proficiency(skill) {
            Some(p) if (25.0..=75.0).contains(&p) => SWEET_SPOT_BONUS,
            Some(p) if p > 90.0 => TOO_EASY_PENALTY,
            Some(p) if p < 10.0 => TOO_HARD_PENALTY,
            Some(_) => 0.0,
            None => EXPLORATION_BONUS,
        })
        .sum();
    sum / module.skills.len() as f64
}

pub fn difficulty_term(module: &Module, profile: &LearnerProfile) -> f64 {
    let diff = (module.difficulty_level() as i32 - profile.preferred_difficulty.level() as i32).abs();
    if diff <= 1 {
        DIFFICULTY_MATCH_BONUS
    } else {
        -DIFFICULTY_MISMATCH_RATE * diff as f64
    }
}

pub fn pace_term(module: &Module, pace: Pace) -> f64 {
    let duration = module.duration_secs();
    let matches = match pace {
        Pace::Fast => duration < 300.0,
        Pace::Slow => duration > 1200.0,
        Pace::Normal => (600.0..=1200.0).contains(&duration),
    };
    if matches {
        PACE_MATCH_BONUS
    } else {
        0.0
    }
}

/// Human-readable summary of why a module ranked where it did.
pub fn reasoning(module: &Module, profile: &LearnerProfile, breakdown: &ScoreBreakdown) -> String {
    let mut parts = Vec::new();

    if breakdown.gap_count == 1 {
        parts.push("Closes 1 skill gap".to_string());
    } else if breakdown.gap_count > 1 {
        parts.push(format!("Closes {} skill gaps", breakdown.gap_count));
    }

    if breakdown.pace_match > 0.0 {
        parts.push(format!("Fits your {} learning pace", profile.learning_pace.as_str()));
    }

    let module_level = module.difficulty_level();
    let preferred = profile.preferred_difficulty.level();
    if module_level < preferred {
        parts.push("Confidence-building review".to_string());
    } else if module_level > preferred {
        parts.push("A challenge to stretch your skills".to_string());
    } else {
        parts.push("Right at your preferred difficulty".to_string());
    }

    parts.join("; ")
}
