//! The embedding index: one provider, one store, one collection.
//!
//! [`EmbeddingIndex`] owns the write path (embed a chunk batch, upsert
//! records) and the raw read path (embed a query, nearest-neighbor
//! search). Relevance scoring is layered on top by
//! [`ranker`](crate::ranker) via the pipeline.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::document::{Chunk, IndexedRecord, RawMatch};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::store::VectorStore;

/// Durable mapping from chunk record id to (vector, text, metadata),
/// with nearest-neighbor search, bound to one named collection.
pub struct EmbeddingIndex {
    store: Arc<dyn VectorStore>,
    provider: Arc<dyn EmbeddingProvider>,
    collection: String,
}

impl EmbeddingIndex {
    /// Open the index against a named collection, creating it if absent.
    ///
    /// The collection is bound to the provider's dimensionality. An open
    /// failure is fatal: no usable index is constructed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Store`] if the collection cannot be created
    /// or reopened, including when it exists with a different
    /// dimensionality.
    pub async fn open(
        store: Arc<dyn VectorStore>,
        provider: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Result<Self> {
        let collection = collection.into();
        store.open_collection(&collection, provider.dimensions()).await?;
        Ok(Self { store, provider, collection })
    }

    /// The name of the collection this index is bound to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Embed a batch of chunks in one provider call and upsert them.
    ///
    /// Records are keyed `{source}_{chunk_id}`, so re-adding a document's
    /// chunks overwrites its prior records rather than duplicating them.
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Fails as a whole batch: if embedding or the store write fails for
    /// any record, no record is guaranteed written and the caller should
    /// re-chunk and retry the full set.
    pub async fn add(&self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        info!(collection = %self.collection, chunk_count = texts.len(), "embedding chunk batch");
        let vectors = self.provider.embed_batch(&texts).await.map_err(|e| {
            error!(collection = %self.collection, error = %e, "embedding failed during add");
            e
        })?;
        if vectors.len() != chunks.len() {
            return Err(RagError::Embedding {
                provider: "batch".to_string(),
                message: format!(
                    "provider returned {} vectors for {} inputs",
                    vectors.len(),
                    chunks.len()
                ),
            });
        }

        let records: Vec<IndexedRecord> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexedRecord {
                id: chunk.record_id(),
                vector,
                text: chunk.content.clone(),
                metadata: chunk.metadata(),
            })
            .collect();

        self.store.upsert(&self.collection, &records).await.map_err(|e| {
            error!(collection = %self.collection, error = %e, "upsert failed during add");
            e
        })?;
        info!(collection = %self.collection, record_count = records.len(), "added records");
        Ok(records.len())
    }

    /// Return the `k` nearest records to `query`, ascending by distance.
    ///
    /// An empty collection short-circuits to an empty result without
    /// invoking the embedding provider. `k` larger than the record count
    /// returns every record.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] or [`RagError::Store`] if the
    /// query embedding or the store search fails.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<RawMatch>> {
        if self.is_empty().await {
            return Ok(Vec::new());
        }
        let vector = self.provider.embed(query).await?;
        let matches = self.store.query(&self.collection, &vector, k).await?;
        info!(collection = %self.collection, result_count = matches.len(), "search completed");
        Ok(matches)
    }

    /// The current record count.
    pub async fn count(&self) -> Result<usize> {
        self.store.count(&self.collection).await
    }

    /// Atomically drop all records, leaving the collection empty but
    /// still bound to the same name, dimensionality, and metric.
    pub async fn clear(&self) -> Result<()> {
        self.store.clear(&self.collection).await
    }

    /// Whether the collection holds no records.
    ///
    /// Never fails: if the count cannot be read, the index reports
    /// itself empty. Treating a broken index as empty only skips a
    /// search; the reverse could surface stale data as live results.
    pub async fn is_empty(&self) -> bool {
        match self.store.count(&self.collection).await {
            Ok(count) => count == 0,
            Err(e) => {
                warn!(collection = %self.collection, error = %e, "count failed, treating index as empty");
                true
            }
        }
    }
}
