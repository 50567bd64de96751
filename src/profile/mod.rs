pub mod model;

pub use model::{difficulty_level, Difficulty, LearnerProfile, Pace, DEFAULT_STALE_DAYS};
