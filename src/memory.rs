//! In-memory vector store backend.
//!
//! [`MemoryStore`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. Nothing is persisted; it exists for tests,
//! development, and ephemeral indexes.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexedRecord, RawMatch};
use crate::error::{RagError, Result};
use crate::store::{scan_nearest, VectorStore};

const BACKEND: &str = "memory";

#[derive(Debug)]
struct MemoryCollection {
    dimensions: usize,
    records: HashMap<String, IndexedRecord>,
}

/// An in-memory, flat-scan vector store.
///
/// Collections map record id to record; queries scan every record and
/// sort by cosine distance. The write lock serializes `upsert`/`clear`
/// against in-flight queries.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing_collection(name: &str) -> RagError {
    RagError::Store {
        backend: BACKEND.to_string(),
        message: format!("collection '{name}' has not been opened"),
    }
}

fn check_dimensions(expected: usize, records: &[IndexedRecord]) -> Result<()> {
    for record in records {
        if record.vector.len() != expected {
            return Err(RagError::Store {
                backend: BACKEND.to_string(),
                message: format!(
                    "record '{}' has dimensionality {} but the collection is bound to {}",
                    record.id,
                    record.vector.len(),
                    expected
                ),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn open_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        match collections.get(name) {
            Some(existing) if existing.dimensions != dimensions => Err(RagError::Store {
                backend: BACKEND.to_string(),
                message: format!(
                    "collection '{name}' is bound to dimensionality {} (requested {dimensions})",
                    existing.dimensions
                ),
            }),
            Some(_) => Ok(()),
            None => {
                collections.insert(
                    name.to_string(),
                    MemoryCollection { dimensions, records: HashMap::new() },
                );
                Ok(())
            }
        }
    }

    async fn upsert(&self, collection: &str, records: &[IndexedRecord]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let coll = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        // Validate the whole batch before touching the record set, so a
        // bad record cannot leave a partial write behind.
        check_dimensions(coll.dimensions, records)?;
        for record in records {
            coll.records.insert(record.id.clone(), record.clone());
        }
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
        coll.records = HashMap::new();
        Ok(())
    }
}
