use lazy_static::lazy_static;
use crate::skills::model::SkillGraph;

/// Seed skills and their prerequisites. The edges form a DAG.
pub const DEFAULT_CURRICULUM: &[(&str, &[&str])] = &[
    // programming fundamentals
    ("basic-syntax", &[]),
    ("variables", &["basic-syntax"]),
    ("data-types", &["variables"]),
    ("operators", &["variables"]),
    ("conditionals", &["operators", "data-types"]),
    ("loops", &["conditionals"]),
    ("functions", &["loops"]),
    ("arrays", &["loops"]),
    ("strings", &["data-types"]),
    ("objects", &["arrays", "functions"]),
    ("recursion", &["functions"]),
    ("classes", &["objects"]),
    ("error-handling", &["functions"]),
    ("algorithms", &["recursion", "arrays"]),
    ("data-structures", &["classes", "algorithms"]),
    // language specific
    ("python-basics", &["functions"]),
    ("javascript-basics", &["functions"]),
    ("rust-ownership", &["functions", "data-structures"]),
    ("sql-queries", &["data-types"]),
    // math
    ("arithmetic", &[]),
    ("algebra", &["arithmetic"]),
    ("logic", &["arithmetic"]),
    ("discrete-math", &["algebra", "logic"]),
    // meta-cognitive
    ("problem-solving", &["logic", "conditionals"]),
    ("debugging", &["error-handling", "problem-solving"]),
];

lazy_static! {
    static ref DEFAULT_GRAPH: SkillGraph = build_default_graph();
}

fn build_default_graph() -> SkillGraph {
    let mut graph = SkillGraph::empty("");
    for (name, prereqs) in DEFAULT_CURRICULUM {
        let prereqs: Vec<String> = prereqs.iter().map(|p| p.to_string()).collect();
        graph.add_skill(name, &prereqs);
    }
    graph
}

/// Template graph built once per process; clone it to seed a learner.
pub fn default_graph() -> &'static SkillGraph {
    &DEFAULT_GRAPH
}
