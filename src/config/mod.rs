use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use lazy_static::lazy_static;

const APP_DIR: &str = "learnpath";
const CONFIG_FILE: &str = "engine.toml";
/// Upper bound for `stale_after_days`, roughly a century
pub const MAX_STALE_AFTER_DAYS: i64 = 36_500;

/// Tunables for the recommendation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weight of a new performance score in the proficiency EMA
    pub proficiency_weight: f64,
    /// Proficiency below which a required skill counts as a gap
    pub gap_threshold: f64,
    /// Days of inactivity before a profile is stale
    pub stale_after_days: i64,
    /// Size of the base recommendation pool for selection and adaptive filtering
    pub recommendation_pool: usize,
    pub learner_cache_capacity: usize,
    pub data_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            proficiency_weight: crate::proficiency::PROFICIENCY_WEIGHT,
            gap_threshold: crate::skills::DEFAULT_GAP_THRESHOLD,
            stale_after_days: crate::profile::DEFAULT_STALE_DAYS,
            recommendation_pool: 10,
            learner_cache_capacity: 128,
            data_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .context("Failed to parse engine config")?;
        anyhow::ensure!(
            (0.0..=1.0).contains(&config.proficiency_weight),
            "proficiency_weight must be within [0, 1], got {}",
            config.proficiency_weight
        );
        anyhow::ensure!(
            (1..=MAX_STALE_AFTER_DAYS).contains(&config.stale_after_days),
            "stale_after_days must be within [1, {}], got {}",
            MAX_STALE_AFTER_DAYS,
            config.stale_after_days
        );
        anyhow::ensure!(
            config.recommendation_pool > 0,
            "recommendation_pool must be positive"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Directory learner documents and module files live under.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(app_data_dir)
    }
}

/// Platform-specific application data directory.
pub fn app_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support");
            dir.push(APP_DIR);
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push(APP_DIR);
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share");
            dir.push(APP_DIR);
            return dir;
        }
    }

    // Fallback
    PathBuf::from("data")
}

fn load_engine_config_internal() -> EngineConfig {
    let config_path = app_data_dir().join(CONFIG_FILE);

    if !config_path.exists() {
        tracing::debug!(path = ?config_path, "No engine config file, using defaults");
        return EngineConfig::default();
    }

    match EngineConfig::from_file(&config_path) {
        Ok(config) => {
            tracing::info!(path = ?config_path, "Loaded engine config");
            return config;
        }
        Err(e) => {
            tracing::warn!(path = ?config_path, error = %format!("{:#}", e), "Invalid engine config, using defaults");
        }
    }

    EngineConfig::default()
}

lazy_static! {
    static ref ENGINE_CONFIG: EngineConfig = load_engine_config_internal();
}

/// Get the cached engine configuration (loaded once per process)
pub fn get_engine_config() -> &'static EngineConfig {
    &ENGINE_CONFIG
}
