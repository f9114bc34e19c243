//! Structure Cache
//!
//! Memoizes loaded structures by definition path. The loader itself keeps no
//! state; this cache sits in front of it and reloads a structure when the
//! file's contents change.
//!
//! # Cache Invalidation
//!
//! - **Content-based**: Each access reads the file and compares its SHA-256
//!   digest with the digest recorded at load time. Rewrites that keep the
//!   same mtime (coarse timestamps, fast successive writes) are still seen.
//! - **Explicit**: `invalidate(path)` and `clear()` drop entries
//!
//! Parsing runs on tokio's blocking pool. Concurrent misses for the same path
//! may each load the file; the last load wins. Every caller receives a
//! complete, independent `StructureMetadata`.

use crate::metadata::{MetadataError, StructureLoader};
use crate::models::StructureMetadata;
use chrono::{DateTime, Utc};
use sha2::digest::Output;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

struct CachedStructure {
    structure: Arc<StructureMetadata>,
    digest: Output<Sha256>,
    loaded_at: DateTime<Utc>,
}

/// Cache of loaded structures keyed by definition path
pub struct StructureCache {
    loader: Arc<StructureLoader>,

    /// Map: definition path → loaded structure
    entries: Arc<RwLock<HashMap<PathBuf, CachedStructure>>>,

    hits: AtomicU64,
    loads: AtomicU64,
}

impl StructureCache {
    /// Create an empty cache in front of `loader`
    pub fn new(loader: Arc<StructureLoader>) -> Self {
        Self {
            loader,
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: AtomicU64::new(0),
            loads: AtomicU64::new(0),
        }
    }

    /// Get the structure defined at `path`, loading it if needed
    ///
    /// # Errors
    ///
    /// - `SourceNotFound`: File missing or unreadable (any cached entry is dropped)
    /// - `LoadInterrupted`: The blocking parse task panicked or was cancelled
    /// - Any loader error; the previous cached entry is left untouched
    pub async fn get(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<StructureMetadata>, MetadataError> {
        let path = path.as_ref();

        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(source) => {
                self.entries.write().await.remove(path);
                return Err(MetadataError::source_not_found(path, source));
            }
        };
        let digest = Sha256::digest(&content);

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(path) {
                if entry.digest == digest {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(Arc::clone(&entry.structure));
                }
            }
        }

        let loader = Arc::clone(&self.loader);
        let source = path.to_path_buf();
        let policy = loader.config().invalid_type_policy;
        let loaded =
            tokio::task::spawn_blocking(move || loader.load_from_bytes(&content, source, policy))
                .await
                .map_err(|err| MetadataError::load_interrupted(path, err.to_string()))?;

        let structure = Arc::new(loaded?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Cached structure '{}' from {}", structure.key(), path.display());

        let mut entries = self.entries.write().await;
        entries.insert(
            path.to_path_buf(),
            CachedStructure {
                structure: Arc::clone(&structure),
                digest,
                loaded_at: Utc::now(),
            },
        );

        Ok(structure)
    }

    /// Drop the cached entry for `path`, forcing a reload on next access
    pub async fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        self.entries.write().await.remove(path.as_ref()).is_some()
    }

    /// Drop all cached entries
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Get cache statistics (for debugging/monitoring)
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;

        CacheStats {
            entries: entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            last_load: entries.values().map(|entry| entry.loaded_at).max(),
        }
    }
}

/// Statistics about the structure cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached structures
    pub entries: usize,
    /// Accesses served from the cache
    pub hits: u64,
    /// Accesses that loaded from disk
    pub loads: u64,
    /// Most recent load time of any cached entry (None if empty)
    pub last_load: Option<DateTime<Utc>>,
}
