use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use chrono::{DateTime, Utc};
use crate::proficiency::{self, PROFICIENCY_WEIGHT};

/// Proficiency at or above which a skill counts as mastered.
pub const MASTERY_THRESHOLD: f64 = 75.0;
/// Minimum prerequisite proficiency for a dependent skill to be ready.
pub const READINESS_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Novice,
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Novice,
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
    ];

    pub fn from_proficiency(proficiency: f64) -> Self {
        if proficiency >= 75.0 {
            SkillLevel::Advanced
        } else if proficiency >= 50.0 {
            SkillLevel::Intermediate
        } else if proficiency >= 25.0 {
            SkillLevel::Beginner
        } else {
            SkillLevel::Novice
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Novice => "novice",
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    pub name: String,
    pub proficiency: f64,
    pub practice_count: u32,
    #[serde(default)]
    pub last_practiced_at: Option<DateTime<Utc>>,
    /// Skills this one depends on, in declaration order, without duplicates
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl SkillNode {
    pub fn new<S: Into<String>>(name: S, prerequisites: &[String]) -> Self {
        let mut node = SkillNode {
            name: name.into(),
            proficiency: 0.0,
            practice_count: 0,
            last_practiced_at: None,
            prerequisites: Vec::with_capacity(prerequisites.len()),
        };
        for prereq in prerequisites {
            if !node.prerequisites.contains(prereq) {
                node.prerequisites.push(prereq.clone());
            }
        }
        node
    }

    pub fn level(&self) -> SkillLevel {
        SkillLevel::from_proficiency(self.proficiency)
    }

    pub fn is_mastered(&self) -> bool {
        self.proficiency >= MASTERY_THRESHOLD
    }
}

/// Persisted shape of a skill graph. Nodes keep their insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGraphRecord {
    pub learner_id: String,
    pub nodes: Vec<SkillNode>,
    pub updated_at: DateTime<Utc>,
}

/// Per-learner skill tree.
///
/// Nodes are addressed by name; `index` maps a name to its slot in `nodes`
/// so iteration follows insertion order while lookups stay O(1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SkillGraphRecord", into = "SkillGraphRecord")]
pub struct SkillGraph {
    pub learner_id: String,
    nodes: Vec<SkillNode>,
    index: HashMap<String, usize>,
    pub updated_at: DateTime<Utc>,
}

impl SkillGraph {
    /// Empty graph with no skills.
    pub fn empty<S: Into<String>>(learner_id: S) -> Self {
        SkillGraph {
            learner_id: learner_id.into(),
            nodes: Vec::new(),
            index: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Graph seeded with the default curriculum.
    pub fn seeded<S: Into<String>>(learner_id: S) -> Self {
        let mut graph = super::curriculum::default_graph().clone();
        graph.learner_id = learner_id.into();
        graph.updated_at = Utc::now();
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SkillNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn proficiency(&self, name: &str) -> Option<f64> {
        self.get(name).map(|n| n.proficiency)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter()
    }

    /// Add a skill if it is not already tracked. Existing nodes, including
    /// their prerequisites, are left untouched. Returns true if inserted.
    pub fn add_skill(&mut self, name: &str, prerequisites: &[String]) -> bool {
        if self.contains(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.nodes.len());
        self.nodes.push(SkillNode::new(name, prerequisites));
        true
    }

    /// Record one practice of `name` with a performance score in [0, 100].
    /// Unknown skills are created without prerequisites first.
    pub fn record_practice(&mut self, name: &str, performance: f64) -> &SkillNode {
        self.record_practice_weighted(name, performance, PROFICIENCY_WEIGHT)
    }

    pub fn record_practice_weighted(&mut self, name: &str, performance: f64, weight: f64) -> &SkillNode {
        if self.add_skill(name, &[]) {
            tracing::debug!(
                learner_id = %self.learner_id,
                skill = %name,
                "Created skill on first practice"
            );
        }
        let now = Utc::now();
        let slot = self.index[name];
        let node = &mut self.nodes[slot];
        let before = node.proficiency;
        node.proficiency = proficiency::update_proficiency(before, performance, weight);
        node.practice_count += 1;
        node.last_practiced_at = Some(now);
        self.updated_at = now;

        tracing::debug!(
            learner_id = %self.learner_id,
            skill = %name,
            before = before,
            after = node.proficiency,
            practice_count = node.practice_count,
            "Skill proficiency updated"
        );
        &self.nodes[slot]
    }

    /// Overwrite a proficiency directly. Used when importing state.
    pub fn set_proficiency(&mut self, name: &str, value: f64) {
        self.add_skill(name, &[]);
        let slot = self.index[name];
        self.nodes[slot].proficiency = proficiency::clamp_proficiency(value);
        self.updated_at = Utc::now();
    }
}

impl From<SkillGraphRecord> for SkillGraph {
    fn from(record: SkillGraphRecord) -> Self {
        let mut graph = SkillGraph {
            learner_id: record.learner_id,
            nodes: Vec::with_capacity(record.nodes.len()),
            index: HashMap::with_capacity(record.nodes.len()),
            updated_at: record.updated_at,
        };
        for mut node in record.nodes {
            if graph.contains(&node.name) {
                tracing::warn!(
                    learner_id = %graph.learner_id,
                    skill = %node.name,
                    "Duplicate skill in stored graph, keeping first"
                );
                continue;
            }
            node.proficiency = proficiency::clamp_proficiency(node.proficiency);
            graph.index.insert(node.name.clone(), graph.nodes.len());
            graph.nodes.push(node);
        }
        graph
    }
}

impl From<SkillGraph> for SkillGraphRecord {
    fn from(graph: SkillGraph) -> Self {
        SkillGraphRecord {
            learner_id: graph.learner_id,
            nodes: graph.nodes,
            updated_at: graph.updated_at,
        }
    }
}
