//! Vector store trait: durable collections of embedded records with
//! nearest-neighbor query.

use async_trait::async_trait;

use crate::document::{IndexedRecord, RawMatch};
use crate::error::Result;

/// A storage backend for named collections of [`IndexedRecord`]s.
///
/// A collection is bound to one embedding dimensionality and one distance
/// metric (cosine) for its lifetime. Implementations must guarantee:
///
/// - `upsert` replaces records with colliding ids in place, so
///   re-indexing a document by source is idempotent;
/// - `upsert` is all-or-nothing: on failure no record of the batch is
///   visible (callers re-ingest and retry rather than reason about
///   partial writes);
/// - `query` returns results ordered by ascending distance, and `k`
///   larger than the record count returns all records;
/// - `clear` atomically replaces the record set with an empty one bound
///   to the same name, dimensionality, and metric;
/// - `clear` and `upsert` are mutually exclusive with in-flight queries.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::{VectorStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.open_collection("documentation", 384).await?;
/// store.upsert("documentation", &records).await?;
/// let matches = store.query("documentation", &query_vector, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Open a named collection, creating it if absent.
    ///
    /// Reopening an existing collection recovers its prior record set.
    /// Reopening with a different dimensionality is an error: an
    /// embedding-model change requires a new collection.
    async fn open_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Insert or replace records by id.
    async fn upsert(&self, collection: &str, records: &[IndexedRecord]) -> Result<()>;

    /// Return the `k` records nearest to `vector` by cosine distance,
    /// ascending (nearest first).
    async fn query(&self, collection: &str, vector: &[f32], k: usize) -> Result<Vec<RawMatch>>;

    /// The number of records currently in the collection.
    async fn count(&self, collection: &str) -> Result<usize>;

    /// Drop all records, leaving an empty collection with the same
    /// name, dimensionality, and metric.
    async fn clear(&self, collection: &str) -> Result<()>;
}

/// Cosine distance between two vectors: `1 - cosine_similarity`.
///
/// Lies in `[0, 2]`. A zero-magnitude vector on either side yields a
/// distance of `1.0` (treated as orthogonal).
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

/// Flat-scan nearest-neighbor over a record set: score every record,
/// sort by ascending distance, truncate to `k`.
pub(crate) fn scan_nearest<'a, I>(records: I, vector: &[f32], k: usize) -> Vec<RawMatch>
where
    I: Iterator<Item = &'a IndexedRecord>,
{
    let mut matches: Vec<RawMatch> = records
        .map(|record| RawMatch {
            content: record.text.clone(),
            metadata: record.metadata.clone(),
            distance: cosine_distance(&record.vector, vector),
        })
        .collect();
    matches.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(k);
    matches
}
