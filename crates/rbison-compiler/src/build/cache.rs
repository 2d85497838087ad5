//! Process-wide record of built engines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use rbison_core::{EngineArtifact, Signature};

/// Built engines by artifact path.
///
/// Entries are matched by [`Signature`], which covers the rendered grammar
/// and the lexer script handed to the toolchain, not the raw grammar file.
/// Editing a rule misses the cache; editing a comment or reformatting does
/// not. An entry is only trusted while its file exists. Each artifact path
/// also has a build lock, so one engine is never built twice at once.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: Mutex<HashMap<PathBuf, EngineArtifact>>,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by every builder that does not bring its own.
    pub fn global() -> Arc<ArtifactCache> {
        static GLOBAL: OnceLock<Arc<ArtifactCache>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(ArtifactCache::new())).clone()
    }

    /// The artifact at `path` if it was built for `signature` and is still on disk.
    pub fn get(&self, path: &Path, signature: &Signature) -> Option<EngineArtifact> {
        let mut entries = lock(&self.entries);
        let artifact = entries.get(path)?;
        if artifact.signature() != signature {
            return None;
        }
        if !artifact.path().exists() {
            log::debug!("cached engine {} is gone", path.display());
            entries.remove(path);
            return None;
        }
        Some(artifact.clone())
    }

    pub fn insert(&self, artifact: EngineArtifact) {
        lock(&self.entries).insert(artifact.path().to_path_buf(), artifact);
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    /// Lock held while the artifact at `path` is checked or built.
    pub(crate) fn build_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        lock(&self.locks)
            .entry(path.to_path_buf())
            .or_default()
            .clone()
    }
}
