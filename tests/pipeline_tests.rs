//! Integration tests for the ingest-and-retrieve pipeline against the
//! in-memory store and a deterministic stub embedding provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use docrag::{
    Document, DocumentType, EmbeddingIndex, EmbeddingProvider, IndexedRecord, MemoryStore,
    Pipeline, RagConfig, RagError, RawMatch, Result, SentenceChunker, VectorStore,
};

const DIM: usize = 8;

/// Deterministic embedding stub: the vector depends only on the text,
/// and every batch call is counted so tests can assert the provider was
/// (or was not) invoked.
struct StubProvider {
    calls: AtomicUsize,
}

impl StubProvider {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn vector_for(text: &str) -> Vec<f32> {
    // Simple multiplicative hash per dimension, then L2-normalize.
    let mut state: u32 = 0x811c_9dc5;
    for byte in text.bytes() {
        state = state.wrapping_mul(16_777_619) ^ u32::from(byte);
    }
    let mut v: Vec<f32> = (0..DIM)
        .map(|i| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223 + i as u32);
            (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5
        })
        .collect();
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    for val in &mut v {
        *val /= norm;
    }
    v
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| vector_for(t)).collect())
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

async fn build_pipeline() -> (Pipeline, Arc<StubProvider>) {
    let config = RagConfig::builder().chunk_size(40).chunk_overlap(10).top_k(5).build().unwrap();
    let provider = Arc::new(StubProvider::new());
    let store = Arc::new(MemoryStore::new());
    let index =
        EmbeddingIndex::open(store, provider.clone(), "documentation").await.unwrap();
    let pipeline = Pipeline::builder()
        .config(config)
        .chunker(Arc::new(SentenceChunker::new(40, 10).unwrap()))
        .index(Arc::new(index))
        .build()
        .unwrap();
    (pipeline, provider)
}

/// A document that splits into exactly two chunks under (40, 10):
/// 60 filler bytes with no sentence boundary.
fn two_chunk_doc(source: &str, fill: char) -> Document {
    Document::new(fill.to_string().repeat(60), source, DocumentType::Txt)
}

#[tokio::test]
async fn ingest_batches_chunks_into_a_single_embedding_call() {
    let (pipeline, provider) = build_pipeline().await;
    let documents =
        vec![two_chunk_doc("a.txt", 'a'), two_chunk_doc("b.txt", 'b'), two_chunk_doc("c.txt", 'c')];

    let written = pipeline.ingest(&documents).await.unwrap();
    assert_eq!(written, 6);
    assert_eq!(pipeline.index().count().await.unwrap(), 6);
    // One batched call for the whole load, not one per document.
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn reingesting_the_same_source_is_idempotent() {
    let (pipeline, _) = build_pipeline().await;
    let documents = vec![two_chunk_doc("a.txt", 'a')];

    pipeline.ingest(&documents).await.unwrap();
    assert_eq!(pipeline.index().count().await.unwrap(), 2);

    pipeline.ingest(&documents).await.unwrap();
    assert_eq!(pipeline.index().count().await.unwrap(), 2, "upsert must replace, not append");
}

#[tokio::test]
async fn reingesting_a_source_overwrites_its_prior_chunks() {
    let (pipeline, _) = build_pipeline().await;
    pipeline.ingest(&[two_chunk_doc("shared.txt", 'x')]).await.unwrap();
    // Same source, same chunk ids, different content.
    pipeline.ingest(&[two_chunk_doc("shared.txt", 'y')]).await.unwrap();

    assert_eq!(pipeline.index().count().await.unwrap(), 2);
    let results = pipeline.retrieve(&"y".repeat(40)).await.unwrap();
    assert!(results.iter().all(|r| r.content.starts_with('y')));
}

#[tokio::test]
async fn empty_documents_do_not_abort_the_batch() {
    let (pipeline, _) = build_pipeline().await;
    let documents = vec![
        Document::new("", "empty.txt", DocumentType::Txt),
        two_chunk_doc("real.txt", 'r'),
    ];
    let written = pipeline.ingest(&documents).await.unwrap();
    assert_eq!(written, 2);
}

#[tokio::test]
async fn retrieval_on_empty_index_skips_the_embedding_provider() {
    let (pipeline, provider) = build_pipeline().await;
    let results = pipeline.retrieve("anything").await.unwrap();
    assert!(results.is_empty());
    assert_eq!(provider.call_count(), 0, "empty index must not trigger an embedding call");
}

#[tokio::test]
async fn retrieval_returns_ranked_results_in_distance_order() {
    let (pipeline, _) = build_pipeline().await;
    pipeline
        .ingest(&[two_chunk_doc("a.txt", 'a'), two_chunk_doc("b.txt", 'b')])
        .await
        .unwrap();

    // Query with the exact text of one stored chunk: its distance is ~0
    // and it ranks first.
    let query = "a".repeat(40);
    let results = pipeline.retrieve(&query).await.unwrap();
    assert!(!results.is_empty());
    assert!(results[0].distance.abs() < 1e-5);
    assert_eq!(results[0].metadata.source, "a.txt");

    for window in results.windows(2) {
        assert!(window[0].distance <= window[1].distance);
    }
    for result in &results {
        assert!((result.relevance_score - (1.0 - result.distance)).abs() < 1e-6);
    }
}

#[tokio::test]
async fn k_larger_than_record_count_returns_all_records() {
    let (pipeline, _) = build_pipeline().await;
    pipeline.ingest(&[two_chunk_doc("a.txt", 'a')]).await.unwrap();
    let results = pipeline.retrieve_top_k("a", 50).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn clear_empties_the_index_and_subsequent_search() {
    let (pipeline, provider) = build_pipeline().await;
    pipeline
        .ingest(&[two_chunk_doc("a.txt", 'a'), two_chunk_doc("b.txt", 'b'), two_chunk_doc("c.txt", 'c')])
        .await
        .unwrap();
    assert_eq!(pipeline.index().count().await.unwrap(), 6);

    pipeline.index().clear().await.unwrap();
    assert_eq!(pipeline.index().count().await.unwrap(), 0);

    let calls_before = provider.call_count();
    let results = pipeline.retrieve("anything").await.unwrap();
    assert!(results.is_empty());
    assert_eq!(provider.call_count(), calls_before);
}

/// A store whose `count` always fails, to exercise the default-safe
/// emptiness fallback.
struct BrokenCountStore;

#[async_trait]
impl VectorStore for BrokenCountStore {
    async fn open_collection(&self, _name: &str, _dimensions: usize) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, _collection: &str, _records: &[IndexedRecord]) -> Result<()> {
        Ok(())
    }

    async fn query(&self, _collection: &str, _vector: &[f32], _k: usize) -> Result<Vec<RawMatch>> {
        Ok(Vec::new())
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        Err(RagError::Store {
            backend: "broken".to_string(),
            message: format!("count unavailable for '{collection}'"),
        })
    }

    async fn clear(&self, _collection: &str) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn count_failure_is_treated_as_empty_and_skips_embedding() {
    let provider = Arc::new(StubProvider::new());
    let index = EmbeddingIndex::open(Arc::new(BrokenCountStore), provider.clone(), "documentation")
        .await
        .unwrap();

    // A broken count reads as empty rather than erroring out.
    assert!(index.is_empty().await);

    let pipeline = Pipeline::builder()
        .config(RagConfig::default())
        .chunker(Arc::new(SentenceChunker::new(40, 10).unwrap()))
        .index(Arc::new(index))
        .build()
        .unwrap();

    let results = pipeline.retrieve("anything").await.unwrap();
    assert!(results.is_empty());
    assert_eq!(provider.call_count(), 0, "a failed count must not trigger an embedding call");
}

#[tokio::test]
async fn retrieval_respects_configured_top_k() {
    let (pipeline, _) = build_pipeline().await;
    let documents: Vec<Document> = "abcdefgh"
        .chars()
        .map(|c| two_chunk_doc(&format!("{c}.txt"), c))
        .collect();
    pipeline.ingest(&documents).await.unwrap();
    assert_eq!(pipeline.index().count().await.unwrap(), 16);

    let results = pipeline.retrieve("some query").await.unwrap();
    assert_eq!(results.len(), 5);
}
