//! Persistent vector store backend.
//!
//! [`DiskStore`] keeps each collection in memory like
//! [`MemoryStore`](crate::memory::MemoryStore) and mirrors it to one
//! JSON file per collection under a root directory. Reopening the same
//! root with the same collection name recovers the prior record set.
//!
//! Mutations are copy-on-write: the successor record set is built,
//! persisted to a temp file, renamed over the live file, and only then
//! swapped into memory. A failed persist leaves the prior state intact
//! on both disk and in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::document::{IndexedRecord, RawMatch};
use crate::error::{RagError, Result};
use crate::store::{scan_nearest, VectorStore};

const BACKEND: &str = "disk";

/// The distance metric tag written into every collection file. A file
/// carrying a different tag cannot be reopened.
const METRIC: &str = "cosine";

/// On-disk representation of one collection.
#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile {
    name: String,
    dimensions: usize,
    metric: String,
    records: Vec<IndexedRecord>,
}

#[derive(Debug)]
struct DiskCollection {
    dimensions: usize,
    records: HashMap<String, IndexedRecord>,
}

/// A flat-scan vector store persisted as JSON files.
///
/// Suited to the document-helper scale this crate targets: record sets
/// small enough that a full scan per query and a full rewrite per
/// mutation are acceptable in exchange for a trivially durable format.
#[derive(Debug)]
pub struct DiskStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, DiskCollection>>,
}

impl DiskStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Store`] if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| RagError::Store {
            backend: BACKEND.to_string(),
            message: format!("cannot create store directory '{}': {e}", root.display()),
        })?;
        Ok(Self { root, collections: RwLock::new(HashMap::new()) })
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Serialize and durably replace the collection file via a temp-file
    /// rename, so readers never observe a half-written collection.
    async fn persist(&self, name: &str, collection: &DiskCollection) -> Result<()> {
        let file = CollectionFile {
            name: name.to_string(),
            dimensions: collection.dimensions,
            metric: METRIC.to_string(),
            records: collection.records.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec(&file).map_err(|e| store_error(name, "serialize", e))?;

        let path = self.collection_path(name);
        let tmp = self.root.join(format!("{name}.json.tmp"));
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| store_error(name, "write", e))?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| store_error(name, "rename", e))?;
        Ok(())
    }

    async fn load(&self, name: &str, path: &Path) -> Result<DiskCollection> {
        let bytes =
            tokio::fs::read(path).await.map_err(|e| store_error(name, "read", e))?;
        let file: CollectionFile =
            serde_json::from_slice(&bytes).map_err(|e| store_error(name, "parse", e))?;
        if file.metric != METRIC {
            return Err(RagError::Store {
                backend: BACKEND.to_string(),
                message: format!(
                    "collection '{name}' was written with metric '{}', expected '{METRIC}'",
                    file.metric
                ),
            });
        }
        let records =
            file.records.into_iter().map(|r| (r.id.clone(), r)).collect::<HashMap<_, _>>();
        Ok(DiskCollection { dimensions: file.dimensions, records })
    }
}

fn store_error(name: &str, op: &str, err: impl std::fmt::Display) -> RagError {
    RagError::Store {
        backend: BACKEND.to_string(),
        message: format!("{op} failed for collection '{name}': {err}"),
    }
}

fn missing_collection(name: &str) -> RagError {
    RagError::Store {
        backend: BACKEND.to_string(),
        message: format!("collection '{name}' has not been opened"),
    }
}

fn dimension_mismatch(name: &str, bound: usize, requested: usize) -> RagError {
    RagError::Store {
        backend: BACKEND.to_string(),
        message: format!(
            "collection '{name}' is bound to dimensionality {bound} (requested {requested})"
        ),
    }
}

#[async_trait]
impl VectorStore for DiskStore {
    async fn open_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(RagError::Store {
                backend: BACKEND.to_string(),
                message: format!("'{name}' is not a valid collection name"),
            });
        }

        let mut collections = self.collections.write().await;
        if let Some(existing) = collections.get(name) {
            if existing.dimensions != dimensions {
                return Err(dimension_mismatch(name, existing.dimensions, dimensions));
            }
            return Ok(());
        }

        let path = self.collection_path(name);
        let collection = if path.exists() {
            let loaded = self.load(name, &path).await?;
            if loaded.dimensions != dimensions {
                return Err(dimension_mismatch(name, loaded.dimensions, dimensions));
            }
            info!(collection = name, records = loaded.records.len(), "loaded existing collection");
            loaded
        } else {
            let created = DiskCollection { dimensions, records: HashMap::new() };
            self.persist(name, &created).await?;
            info!(collection = name, "created new collection");
            created
        };
        collections.insert(name.to_string(), collection);
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: &[IndexedRecord]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let coll = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;

        for record in records {
            if record.vector.len() != coll.dimensions {
                return Err(RagError::Store {
                    backend: BACKEND.to_string(),
                    message: format!(
                        "record '{}' has dimensionality {} but collection '{collection}' is bound to {}",
                        record.id,
                        record.vector.len(),
                        coll.dimensions
                    ),
                });
            }
        }

        // Build the successor record set and persist it before exposing
        // it; a failed write leaves the prior state in place.
        let mut next = coll.records.clone();
        for record in records {
            next.insert(record.id.clone(), record.clone());
        }
        let successor = DiskCollection { dimensions: coll.dimensions, records: next };
        self.persist(collection, &successor).await?;
        *coll = successor;
        Ok(())
    }

    async fn query(&self, collection: &str, vector: &[f32], k: usize) -> Result<Vec<RawMatch>> {
        let collections = self.collections.read().await;
        let coll = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        Ok(scan_nearest(coll.records.values(), vector, k))
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        let coll = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        Ok(coll.records.len())
    }

    async fn clear(&self, collection: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let coll = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        let successor = DiskCollection { dimensions: coll.dimensions, records: HashMap::new() };
        self.persist(collection, &successor).await?;
        *coll = successor;
        info!(collection, "cleared collection");
        Ok(())
    }
}
