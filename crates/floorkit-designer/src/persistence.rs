//! Persistence Adapter
//!
//! [`LayoutRepository`] keeps the layout collection cached in memory and
//! writes the full collection through a [`LayoutBackend`] on every save or
//! delete. Layouts are only persisted when the caller saves explicitly.
//!
//! Corrupt persisted data is logged and treated as an empty collection. A
//! first load that finds nothing persisted falls back to the bundled sample
//! layouts (unless disabled).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use floorkit_core::{Result, StorageError};
use floorkit_settings::{EditorConfig, StorageSettings};
use parking_lot::Mutex;

use crate::layout::{Layout, DEFAULT_BOUNDARY_HEIGHT, DEFAULT_BOUNDARY_WIDTH};
use crate::serialization::{layouts_from_json, layouts_to_json};

/// Sample layouts shipped with the crate
pub const SAMPLE_LAYOUTS_JSON: &str = include_str!("../assets/sample_layouts.json");

/// Raw storage for the serialized layout collection
#[async_trait]
pub trait LayoutBackend: Send + Sync {
    /// Read the stored collection; `None` when nothing was ever stored
    async fn read(&self) -> Result<Option<String>>;

    /// Replace the stored collection
    async fn write(&self, contents: &str) -> Result<()>;

    /// Human-readable location for logs and errors
    fn describe(&self) -> String;
}

/// JSON file on disk, replaced atomically on write
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "layouts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LayoutBackend for JsonFileBackend {
    async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                target: self.describe(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    async fn write(&self, contents: &str) -> Result<()> {
        let write_failed = |e: std::io::Error| StorageError::WriteFailed {
            target: self.describe(),
            reason: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(write_failed)?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, contents)
            .await
            .map_err(write_failed)?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(write_failed)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory backend for tests and previews
#[derive(Debug, Default)]
pub struct MemoryBackend {
    contents: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Last written collection
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }

    /// Make subsequent writes fail, simulating an unreachable store
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LayoutBackend for MemoryBackend {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.lock().clone())
    }

    async fn write(&self, contents: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed {
                target: self.describe(),
                reason: "backend offline".to_string(),
            }
            .into());
        }
        *self.contents.lock() = Some(contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Cached layout collection over a backend
pub struct LayoutRepository<B: LayoutBackend> {
    backend: B,
    cache: Option<Vec<Layout>>,
    bootstrap_sample_data: bool,
    default_boundary: (f64, f64),
}

impl<B: LayoutBackend> LayoutRepository<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: None,
            bootstrap_sample_data: true,
            default_boundary: (DEFAULT_BOUNDARY_WIDTH, DEFAULT_BOUNDARY_HEIGHT),
        }
    }

    /// Apply storage and placement settings to a repository
    pub fn configured(backend: B, config: &EditorConfig) -> Self {
        Self::new(backend)
            .with_sample_data(config.storage.bootstrap_sample_data)
            .with_default_boundary(
                config.placement.default_boundary_width,
                config.placement.default_boundary_height,
            )
    }

    /// Toggle the sample-data fallback for an empty backend
    pub fn with_sample_data(mut self, enabled: bool) -> Self {
        self.bootstrap_sample_data = enabled;
        self
    }

    /// Boundary for layouts created through [`Self::create_layout_for_store`]
    pub fn with_default_boundary(mut self, width: f64, height: f64) -> Self {
        self.default_boundary = (width, height);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load all layouts, reading the backend only until the first success
    pub async fn load_layouts(&mut self) -> Result<Vec<Layout>> {
        Ok(self.ensure_loaded().await?.clone())
    }

    pub async fn get_layout_by_id(&mut self, id: &str) -> Result<Option<Layout>> {
        Ok(self
            .ensure_loaded()
            .await?
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    /// Layout belonging to a store, if any
    pub async fn get_layout_by_object_id(&mut self, object_id: &str) -> Result<Option<Layout>> {
        Ok(self
            .ensure_loaded()
            .await?
            .iter()
            .find(|l| l.object_id == object_id)
            .cloned())
    }

    /// Insert or replace by id, then persist the whole collection.
    ///
    /// The cache only changes once the backend write succeeded.
    pub async fn save_layout(&mut self, layout: &Layout) -> Result<Layout> {
        let mut layouts = self.ensure_loaded().await?.clone();

        let mut stored = layout.clone();
        if stored.id.is_empty() {
            stored.id = uuid::Uuid::new_v4().to_string();
        }
        stored.touch();

        match layouts.iter_mut().find(|l| l.id == stored.id) {
            Some(existing) => *existing = stored.clone(),
            None => layouts.push(stored.clone()),
        }

        self.persist(layouts).await?;
        tracing::info!(
            "Saved layout '{}' ({} elements) to {}",
            stored.name,
            stored.elements.len(),
            self.backend.describe()
        );
        Ok(stored)
    }

    /// Remove a layout; returns false when the id is unknown
    pub async fn delete_layout(&mut self, id: &str) -> Result<bool> {
        let mut layouts = self.ensure_loaded().await?.clone();
        let before = layouts.len();
        layouts.retain(|l| l.id != id);
        if layouts.len() == before {
            return Ok(false);
        }
        self.persist(layouts).await?;
        tracing::info!("Deleted layout {}", id);
        Ok(true)
    }

    /// Create and persist an empty layout for a store
    pub async fn create_layout_for_store(
        &mut self,
        object_id: &str,
        name: &str,
    ) -> Result<Layout> {
        let (width, height) = self.default_boundary;
        let layout = Layout::new_for_store(object_id, name, width, height);
        self.save_layout(&layout).await
    }

    /// Drop the cache so the next access re-reads the backend
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    async fn persist(&mut self, layouts: Vec<Layout>) -> Result<()> {
        let json = layouts_to_json(&layouts)?;
        self.backend.write(&json).await?;
        self.cache = Some(layouts);
        Ok(())
    }

    async fn ensure_loaded(&mut self) -> Result<&Vec<Layout>> {
        if self.cache.is_none() {
            let layouts = match self.backend.read().await? {
                Some(json) => match layouts_from_json(&json) {
                    Ok(layouts) => {
                        tracing::info!(
                            "Loaded {} layouts from {}",
                            layouts.len(),
                            self.backend.describe()
                        );
                        layouts
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Ignoring corrupt layout data in {}: {}",
                            self.backend.describe(),
                            e
                        );
                        Vec::new()
                    }
                },
                None if self.bootstrap_sample_data => {
                    tracing::info!("No stored layouts, using bundled sample data");
                    sample_layouts()
                }
                None => Vec::new(),
            };
            self.cache = Some(layouts);
        }
        Ok(&*self.cache.get_or_insert_with(Vec::new))
    }
}

impl LayoutRepository<JsonFileBackend> {
    /// Repository over the configured layouts file
    pub fn from_settings(storage: &StorageSettings) -> Self {
        Self::new(JsonFileBackend::new(storage.layouts_file.clone()))
            .with_sample_data(storage.bootstrap_sample_data)
    }
}

/// Bundled sample layouts; empty if the asset fails to parse
pub fn sample_layouts() -> Vec<Layout> {
    layouts_from_json(SAMPLE_LAYOUTS_JSON).unwrap_or_else(|e| {
        tracing::warn!("Bundled sample layouts are invalid: {}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_layouts_parse() {
        let layouts = sample_layouts();
        assert_eq!(layouts.len(), 2);
        assert!(layouts.iter().all(|l| !l.object_id.is_empty()));
    }

    #[test]
    fn test_temp_path_sits_beside_target() {
        let backend = JsonFileBackend::new("/data/floorkit/layouts.json");
        assert_eq!(
            backend.temp_path(),
            PathBuf::from("/data/floorkit/layouts.json.tmp")
        );
    }

    #[tokio::test]
    async fn test_memory_backend_failure_keeps_cache() {
        let mut repo = LayoutRepository::new(MemoryBackend::new()).with_sample_data(false);
        let layout = Layout::new_for_store("S1", "One", 100.0, 100.0);
        repo.save_layout(&layout).await.unwrap();

        repo.backend().set_fail_writes(true);
        let other = Layout::new_for_store("S2", "Two", 100.0, 100.0);
        assert!(repo.save_layout(&other).await.is_err());
        assert_eq!(repo.load_layouts().await.unwrap().len(), 1);
    }
}
