pub mod module;
pub mod catalog;

pub use module::{Module, ModuleDifficulty, Widget, ADVANCED_WIDGETS, DEFAULT_DURATION_SECS};
pub use catalog::{JsonDirCatalog, ModuleCatalog, StaticCatalog};
