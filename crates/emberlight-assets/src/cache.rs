use std::collections::HashMap;
use std::path::{Path, PathBuf};

use emberlight_core::GpuResidency;
use tracing::{debug, info};

use crate::diagnostic::{LoadDiagnostic, LoadStage};
use crate::error::AssetError;
use crate::glb::{self, ModelAsset};

/// Handle to a model held by a [`ModelCache`]. Valid for the cache that
/// issued it until `evict_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(u64);

/// Path-keyed model cache. Each distinct normalized path is decoded at most
/// once for the lifetime of the cache; loads never fail from the caller's
/// point of view (a bad file caches the fallback model and a diagnostic).
pub struct ModelCache {
    base_path: PathBuf,
    next_id: u64,
    models: HashMap<u64, ModelAsset>,
    residency: HashMap<u64, GpuResidency>,
    by_key: HashMap<String, ModelHandle>,
    diagnostics: Vec<LoadDiagnostic>,
}

impl ModelCache {
    /// Create a cache that resolves relative paths against `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("model cache created, base path: {}", base_path.display());
        Self {
            base_path,
            next_id: 1,
            models: HashMap::new(),
            residency: HashMap::new(),
            by_key: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Normalize a path into the cache key: case folded, backslashes as
    /// separators, empty and `.` segments dropped. Equivalent spellings of
    /// the same path must land on the same key.
    fn cache_key(path: &Path) -> String {
        let text = path.to_string_lossy().to_lowercase().replace('\\', "/");
        let rooted = text.starts_with('/');
        let joined = text
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/");
        if rooted {
            format!("/{joined}")
        } else {
            joined
        }
    }

    /// Load the model at `path`, or return the existing handle if an
    /// equivalent path was loaded before. Never fails: unreadable or
    /// undecodable files yield the default-cube fallback and a retained
    /// diagnostic.
    pub fn get_or_load(&mut self, path: &Path) -> ModelHandle {
        let full_path = self.resolve(path);
        let key = Self::cache_key(&full_path);

        if let Some(&handle) = self.by_key.get(&key) {
            debug!("cache hit for '{}'", full_path.display());
            return handle;
        }

        let (model, diagnostic) = match std::fs::read(&full_path) {
            Ok(raw) => glb::assemble(&raw, &full_path),
            Err(e) => {
                let diagnostic = LoadDiagnostic {
                    path: full_path.clone(),
                    stage: LoadStage::ReadFile,
                    error: AssetError::FileUnavailable(full_path.clone(), e),
                };
                (ModelAsset::fallback(&full_path), Some(diagnostic))
            }
        };

        if let Some(diagnostic) = diagnostic {
            self.diagnostics.push(diagnostic);
        }

        let handle = ModelHandle(self.next_id);
        self.next_id += 1;
        self.models.insert(handle.0, model);
        self.by_key.insert(key, handle);
        debug!("loaded '{}' as {:?}", full_path.display(), handle);
        handle
    }

    /// The model behind a handle. `None` only for handles from another cache
    /// or from before an `evict_all`.
    pub fn get(&self, handle: ModelHandle) -> Option<&ModelAsset> {
        self.models.get(&handle.0)
    }

    /// GPU residency recorded for a handle by the rendering backend.
    pub fn residency(&self, handle: ModelHandle) -> GpuResidency {
        self.residency.get(&handle.0).copied().unwrap_or_default()
    }

    /// Record the backend's uploaded resources for a cached model.
    pub fn set_residency(&mut self, handle: ModelHandle, residency: GpuResidency) {
        self.residency.insert(handle.0, residency);
    }

    /// Diagnostics accumulated from degraded loads, oldest first.
    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    /// Drop every cached model and handle. The rendering backend must have
    /// released any recorded GPU resources before this call; the cache only
    /// owns the CPU-side data.
    pub fn evict_all(&mut self) {
        info!("evicting {} cached models", self.models.len());
        self.models.clear();
        self.residency.clear();
        self.by_key.clear();
        self.diagnostics.clear();
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberlight_core::{GpuMeshHandle, GpuResidency};

    #[test]
    fn equivalent_paths_share_one_entry() {
        let mut cache = ModelCache::new("/game/assets");
        let first = cache.get_or_load(Path::new("Models/Crate.GLB"));
        let second = cache.get_or_load(Path::new("models\\crate.glb"));
        let third = cache.get_or_load(Path::new("./models/crate.glb"));

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(cache.len(), 1);
        // One decode attempt, one diagnostic (the file does not exist).
        assert_eq!(cache.diagnostics().len(), 1);
        assert_eq!(cache.diagnostics()[0].stage, LoadStage::ReadFile);
    }

    #[test]
    fn missing_file_still_yields_a_model() {
        let mut cache = ModelCache::new("/nonexistent");
        let handle = cache.get_or_load(Path::new("missing.glb"));
        let model = cache.get(handle).unwrap();
        model.mesh.validate().unwrap();
        assert_eq!(model.mesh.positions.len(), 24);
        assert!(matches!(
            cache.diagnostics()[0].error,
            AssetError::FileUnavailable(..)
        ));
    }

    #[test]
    fn distinct_paths_get_distinct_handles() {
        let mut cache = ModelCache::new("/assets");
        let a = cache.get_or_load(Path::new("a.glb"));
        let b = cache.get_or_load(Path::new("b.glb"));
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn residency_round_trips_and_clears_on_evict() {
        let mut cache = ModelCache::new("/assets");
        let handle = cache.get_or_load(Path::new("a.glb"));
        assert!(!cache.residency(handle).is_resident());

        cache.set_residency(
            handle,
            GpuResidency {
                mesh: Some(GpuMeshHandle(7)),
                textures: [None, None, None],
            },
        );
        assert!(cache.residency(handle).is_resident());

        cache.evict_all();
        assert!(cache.is_empty());
        assert!(cache.get(handle).is_none());
        assert!(cache.diagnostics().is_empty());
    }

    #[test]
    fn cache_key_normalization() {
        assert_eq!(
            ModelCache::cache_key(Path::new("/Assets//Models/./Tree.glb")),
            "/assets/models/tree.glb"
        );
        assert_eq!(
            ModelCache::cache_key(Path::new("a\\B\\c.glb")),
            "a/b/c.glb"
        );
    }
}
