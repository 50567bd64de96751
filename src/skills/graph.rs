//! Read-only traversals over a [`SkillGraph`].
//!
//! Prerequisite edges may form cycles once learners pick up skills outside
//! the seed curriculum. Every depth-first walk here tracks a three-colour
//! mark per skill: an edge into a skill still on the stack is a back edge and
//! is skipped, so traversals always terminate.

use std::collections::{HashMap, HashSet};
use serde::{Serialize, Deserialize};
use crate::skills::model::{SkillGraph, SkillLevel, MASTERY_THRESHOLD, READINESS_THRESHOLD};

/// Proficiency below which a required skill is reported as a gap.
pub const DEFAULT_GAP_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// How many tracked skills sit at each level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub total: usize,
    pub novice: usize,
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
}

impl LevelDistribution {
    pub fn count(&self, level: SkillLevel) -> usize {
        match level {
            SkillLevel::Novice => self.novice,
            SkillLevel::Beginner => self.beginner,
            SkillLevel::Intermediate => self.intermediate,
            SkillLevel::Advanced => self.advanced,
        }
    }

    /// Share of skills at `level`, as a percentage. Zero for an empty graph.
    pub fn percentage(&self, level: SkillLevel) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(level) as f64 / self.total as f64 * 100.0
    }

    pub fn mastery_percentage(&self) -> f64 {
        self.percentage(SkillLevel::Advanced)
    }
}

impl SkillGraph {
    /// Required skills that are untracked or below `threshold`, in the order given.
    pub fn gaps(&self, required: &[String], threshold: f64) -> Vec<String> {
        required
            .iter()
            .filter(|skill| match self.get(skill) {
                Some(node) => node.proficiency < threshold,
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Unmastered skills whose prerequisites are all tracked and at least
    /// at the readiness threshold. Graph insertion order.
    pub fn recommended_next_skills(&self) -> Vec<String> {
        self.nodes()
            .filter(|node| node.proficiency < MASTERY_THRESHOLD)
            .filter(|node| {
                node.prerequisites.iter().all(|prereq| {
                    self.proficiency(prereq)
                        .map(|p| p >= READINESS_THRESHOLD)
                        .unwrap_or(false)
                })
            })
            .map(|node| node.name.clone())
            .collect()
    }

    /// Unmastered skills on the prerequisite chain of `target`, each listed
    /// after its own prerequisites and ending with `target` if it is itself
    /// unmastered. Empty when `target` is not tracked.
    pub fn progression_path(&self, target: &str) -> Vec<String> {
        if !self.contains(target) {
            return Vec::new();
        }
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut path = Vec::new();
        self.visit_chain(target, &mut marks, &mut path);
        path
    }

    fn visit_chain<'a>(&'a self, name: &'a str, marks: &mut HashMap<&'a str, Mark>, path: &mut Vec<String>) {
        match marks.get(name) {
            Some(Mark::Done) => return,
            Some(Mark::Visiting) => {
                tracing::debug!(
                    learner_id = %self.learner_id,
                    skill = %name,
                    "Skipping prerequisite cycle edge"
                );
                return;
            }
            None => {}
        }
        let Some(node) = self.get(name) else {
            return;
        };
        marks.insert(name, Mark::Visiting);
        for prereq in &node.prerequisites {
            self.visit_chain(prereq, marks, path);
        }
        marks.insert(name, Mark::Done);
        if !node.is_mastered() {
            path.push(node.name.clone());
        }
    }

    /// Order `skills` so that each one follows its in-set prerequisites.
    ///
    /// Prerequisites outside the set do not constrain the order. Skills with
    /// no ordering constraint between them keep their relative input order.
    /// Duplicates in the input are emitted once.
    pub fn topological_order(&self, skills: &[String]) -> Vec<String> {
        let members: HashSet<&str> = skills.iter().map(String::as_str).collect();
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut order = Vec::with_capacity(members.len());
        for skill in skills {
            self.visit_ordered(skill, &members, &mut marks, &mut order);
        }
        order
    }

    fn visit_ordered<'a>(
        &'a self,
        name: &'a str,
        members: &HashSet<&str>,
        marks: &mut HashMap<&'a str, Mark>,
        order: &mut Vec<String>,
    ) {
        match marks.get(name) {
            Some(Mark::Done) => return,
            Some(Mark::Visiting) => {
                tracing::debug!(
                    learner_id = %self.learner_id,
                    skill = %name,
                    "Skipping back edge during topological sort"
                );
                return;
            }
            None => {}
        }
        marks.insert(name, Mark::Visiting);
        if let Some(node) = self.get(name) {
            for prereq in &node.prerequisites {
                if members.contains(prereq.as_str()) {
                    self.visit_ordered(prereq, members, marks, order);
                }
            }
        }
        marks.insert(name, Mark::Done);
        order.push(name.to_string());
    }

    pub fn level_distribution(&self) -> LevelDistribution {
        let mut dist = LevelDistribution {
            total: self.len(),
            novice: 0,
            beginner: 0,
            intermediate: 0,
            advanced: 0,
        };
        for node in self.nodes() {
            match node.level() {
                SkillLevel::Novice => dist.novice += 1,
                SkillLevel::Beginner => dist.beginner += 1,
                SkillLevel::Intermediate => dist.intermediate += 1,
                SkillLevel::Advanced => dist.advanced += 1,
            }
        }
        dist
    }

    /// Skills that have been practiced more than twice and are still below
    /// the readiness threshold. Never-practiced skills are not included.
    pub fn struggling_skills(&self, limit: usize) -> Vec<String> {
        self.nodes()
            .filter(|node| node.proficiency < READINESS_THRESHOLD && node.practice_count > 2)
            .map(|node| node.name.clone())
            .take(limit)
            .collect()
    }
}
