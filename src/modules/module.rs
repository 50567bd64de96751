use serde::{Deserialize, Serialize};
use crate::profile::difficulty_level;

/// Duration assumed for a module that does not declare one. Used both by
/// the pace term of the scorer and by the difficulty heuristic.
pub const DEFAULT_DURATION_SECS: f64 = 600.0;

/// Widget ids that mark a module as more demanding.
pub const ADVANCED_WIDGETS: &[&str] = &[
    "code-editor",
    "code-sandbox",
    "debugger",
    "terminal",
    "sql-console",
    "proof-builder",
    "graph-plotter",
];

/// Declared difficulty, either by name or on the 1-5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleDifficulty {
    Level(f64),
    Named(String),
}

impl ModuleDifficulty {
    pub fn level(&self) -> u8 {
        match self {
            ModuleDifficulty::Level(v) if v.is_finite() => v.round().clamp(1.0, 5.0) as u8,
            ModuleDifficulty::Level(_) => 2,
            ModuleDifficulty::Named(name) => difficulty_level(name),
        }
    }
}

/// Interactive element of a module. Only the id matters to the engine; the
/// rest of the payload is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub props: serde_json::Map<String, serde_json::Value>,
}

impl Widget {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Widget { id: id.into(), props: serde_json::Map::new() }
    }

    pub fn is_advanced(&self) -> bool {
        ADVANCED_WIDGETS.contains(&self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<ModuleDifficulty>,
    #[serde(default, alias = "estimated_duration")]
    pub estimated_duration_secs: Option<f64>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Module {
    pub fn new<S: Into<String>>(id: S, skills: &[&str]) -> Self {
        Module {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            difficulty: None,
            estimated_duration_secs: None,
            widgets: Vec::new(),
        }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: ModuleDifficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.estimated_duration_secs = Some(secs);
        self
    }

    pub fn with_widgets(mut self, widgets: Vec<Widget>) -> Self {
        self.widgets = widgets;
        self
    }

    /// Declared duration, or the shared default.
    pub fn duration_secs(&self) -> f64 {
        self.estimated_duration_secs.unwrap_or(DEFAULT_DURATION_SECS)
    }

    /// Difficulty on the 1-5 scale: the declared value if present, otherwise
    /// estimated from the module's shape.
    pub fn difficulty_level(&self) -> u8 {
        match &self.difficulty {
            Some(declared) => declared.level(),
            None => self.estimated_difficulty(),
        }
    }

    pub fn estimated_difficulty(&self) -> u8 {
        let mut points: u32 = 0;
        if self.widgets.len() > 5 {
            points += 1;
        }
        if self.skills.len() > 3 {
            points += 1;
        }
        let duration = self.duration_secs();
        if duration > 3600.0 {
            points += 2;
        } else if duration > 1800.0 {
            points += 1;
        }
        points += self.widgets.iter().filter(|w| w.is_advanced()).count() as u32;
        (points + 1).clamp(1, 5) as u8
    }

    /// Case-insensitive match of `needle` against skills, title and description.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.skills.iter().any(|s| s.to_lowercase().contains(&needle))
            || self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
