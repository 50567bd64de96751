use std::future::Future;
use std::path::PathBuf;
use crate::modules::Module;
use crate::store::StoreError;

/// Read-only source of the full module catalog.
pub trait ModuleCatalog: Send + Sync {
    fn list_modules(&self) -> impl Future<Output = Result<Vec<Module>, StoreError>> + Send;
}

/// Fixed in-memory catalog, returned in the order it was built with.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    modules: Vec<Module>,
}

impl StaticCatalog {
    pub fn new(modules: Vec<Module>) -> Self {
        StaticCatalog { modules }
    }
}

impl ModuleCatalog for StaticCatalog {
    async fn list_modules(&self) -> Result<Vec<Module>, StoreError> {
        Ok(self.modules.clone())
    }
}

/// Catalog backed by a directory of `*.json` module files.
///
/// Files that fail to parse are skipped with a warning. Modules are returned
/// sorted by id so repeated listings agree regardless of directory order.
#[derive(Debug, Clone)]
pub struct JsonDirCatalog {
    dir: PathBuf,
}

impl JsonDirCatalog {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        JsonDirCatalog { dir: dir.into() }
    }

    pub fn from_config(config: &crate::config::EngineConfig) -> Self {
        Self::new(config.data_dir().join("modules"))
    }
}

impl ModuleCatalog for JsonDirCatalog {
    async fn list_modules(&self) -> Result<Vec<Module>, StoreError> {
        let mut modules = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.dir, "Module directory missing, catalog is empty");
                return Ok(modules);
            }
            Err(e) => {
                return Err(StoreError::Io { path: self.dir.clone(), source: e });
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io { path: self.dir.clone(), source: e })?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match tokio::fs::read_to_string(&path).await {
                Ok(text) => match serde_json::from_str::<Module>(&text) {
                    Ok(module) => modules.push(module),
                    Err(e) => {
                        tracing::warn!(path = ?path, error = %e, "Failed to parse module file");
                    }
                },
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Failed to read module file");
                }
            }
        }

        modules.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!(path = ?self.dir, count = modules.len(), "Loaded module catalog");
        Ok(modules)
    }
}
