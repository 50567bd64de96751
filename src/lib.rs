//! Adaptive recommendation engine.
//!
//! Tracks per-learner skill proficiency in a prerequisite graph, keeps
//! aggregate learner statistics, and ranks catalog modules into
//! recommendations and learning paths.

pub mod proficiency;
pub mod skills;
pub mod profile;
pub mod modules;
pub mod selector;
pub mod engine;
pub mod store;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod metrics;

pub use engine::{Engine, Performance, RecommendationContext};
pub use error::{EngineError, ErrorKind};
pub use modules::{Module, ModuleCatalog, StaticCatalog};
pub use profile::{Difficulty, LearnerProfile, Pace};
pub use skills::{SkillGraph, SkillLevel, SkillNode};
pub use store::{LearnerStore, MemoryStore};
