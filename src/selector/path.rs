use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::modules::Module;
use crate::skills::SkillGraph;

pub const DEFAULT_MAX_MODULES: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathStep {
    pub module: Module,
    /// Required skills this module was chosen to cover
    pub target_skills: Vec<String>,
    /// 1-based position in the path
    pub position: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningPath {
    pub steps: Vec<PathStep>,
    /// Unmastered skills on the way to the targets, prerequisites first
    pub required_skills: Vec<String>,
    /// Required skills no catalog module teaches
    pub uncovered_skills: Vec<String>,
}

/// Plan an ordered sequence of modules covering the unmastered prerequisite
/// chains of `targets`.
///
/// Greedy cover over the topologically ordered required skills: for each
/// skill not yet covered, take the module teaching the most still-uncovered
/// required skills. Ties go to the lowest module id.
pub fn build_learning_path(
    graph: &SkillGraph,
    catalog: &[Module],
    targets: &[String],
    max_modules: usize,
) -> LearningPath {
    let mut required: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for target in targets {
        for skill in graph.progression_path(target) {
            if seen.insert(skill.clone()) {
                required.push(skill);
            }
        }
    }
    let ordered = graph.topological_order(&required);

    let mut modules: Vec<&Module> = catalog.iter().collect();
    modules.sort_by(|a, b| a.id.cmp(&b.id));

    let required_set: HashSet<&str> = ordered.iter().map(String::as_str).collect();
    let mut covered: HashSet<String> = HashSet::new();
    let mut steps: Vec<PathStep> = Vec::new();
    let mut uncovered_skills = Vec::new();

    for skill in &ordered {
        if steps.len() >= max_modules {
            break;
        }
        if covered.contains(skill) {
            continue;
        }

        let mut best: Option<(&Module, Vec<String>)> = None;
        for module in modules.iter().copied().filter(|m| m.skills.iter().any(|s| s == skill)) {
            let teaches = uncovered_required(module, &required_set, &covered);
            let better = match &best {
                Some((_, current)) => teaches.len() > current.len(),
                None => true,
            };
            if better {
                best = Some((module, teaches));
            }
        }

        match best {
            Some((module, target_skills)) => {
                covered.extend(module.skills.iter().cloned());
                steps.push(PathStep {
                    module: module.clone(),
                    target_skills,
                    position: steps.len() + 1,
                });
            }
            None => {
                tracing::debug!(skill = %skill, "No module teaches required skill");
                uncovered_skills.push(skill.clone());
            }
        }
    }

    LearningPath {
        steps,
        required_skills: ordered,
        uncovered_skills,
    }
}

/// Required skills `module` teaches that nothing in the path covers yet, in
/// the module's own order.
fn uncovered_required(module: &Module, required: &HashSet<&str>, covered: &HashSet<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for skill in &module.skills {
        if required.contains(skill.as_str()) && !covered.contains(skill) && !out.contains(skill) {
            out.push(skill.clone());
        }
    }
    out
}
