pub mod model;
pub mod graph;
pub mod curriculum;

pub use model::{SkillGraph, SkillGraphRecord, SkillLevel, SkillNode, MASTERY_THRESHOLD, READINESS_THRESHOLD};
pub use graph::{LevelDistribution, DEFAULT_GAP_THRESHOLD};
