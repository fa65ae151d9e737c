//! Pipeline coordinator.
//!
//! [`Pipeline`] composes the write path (chunk every document, embed the
//! accumulated batch once, store) and the read path (embed the query,
//! nearest-neighbor search, relevance ranking). It owns no state beyond
//! references to its collaborators.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docrag::{Pipeline, RagConfig, SentenceChunker, EmbeddingIndex};
//!
//! let config = RagConfig::default();
//! let pipeline = Pipeline::builder()
//!     .config(config.clone())
//!     .chunker(Arc::new(SentenceChunker::new(config.chunk_size, config.chunk_overlap)?))
//!     .index(Arc::new(index))
//!     .build()?;
//!
//! let written = pipeline.ingest(&documents).await?;
//! let results = pipeline.retrieve("how do I configure this?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::error::{RagError, Result};
use crate::index::EmbeddingIndex;
use crate::ranker;

/// Coordinates chunking, embedding, storage, and retrieval.
pub struct Pipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    index: Arc<EmbeddingIndex>,
}

impl Pipeline {
    /// Create a new [`PipelineBuilder`].
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding index.
    pub fn index(&self) -> &Arc<EmbeddingIndex> {
        &self.index
    }

    /// Ingest documents: chunk each one, then issue exactly one `add`
    /// for the accumulated chunk set.
    ///
    /// One batched add means one embedding-provider round-trip per load.
    /// A document with empty or unchunkable content contributes zero
    /// chunks and never aborts the batch. Returns the total number of
    /// chunks written.
    ///
    /// # Errors
    ///
    /// Fails as a whole call if the single `add` fails; the caller may
    /// re-ingest, relying on record-id idempotency to avoid duplicates.
    pub async fn ingest(&self, documents: &[Document]) -> Result<usize> {
        let mut all_chunks: Vec<Chunk> = Vec::new();
        for document in documents {
            let chunks = self.chunker.chunk(document);
            if chunks.is_empty() {
                info!(source = %document.source, "document produced no chunks, skipping");
                continue;
            }
            all_chunks.extend(chunks);
        }

        let written = self.index.add(&all_chunks).await.map_err(|e| {
            error!(error = %e, "ingestion failed");
            RagError::Pipeline(format!("ingestion of {} documents failed: {e}", documents.len()))
        })?;
        info!(document_count = documents.len(), chunks_written = written, "ingested documents");
        Ok(written)
    }

    /// Retrieve the configured `top_k` ranked results for a query.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.retrieve_top_k(query, self.config.top_k).await
    }

    /// Retrieve at most `k` ranked results for a query.
    ///
    /// An empty index yields an empty result without any embedding
    /// call (the check lives in [`EmbeddingIndex::search`]); the caller
    /// is expected to fall back to an ungrounded answer path.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if the query embedding or search
    /// fails.
    pub async fn retrieve_top_k(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let matches = self.index.search(query, k).await.map_err(|e| {
            error!(error = %e, "retrieval failed");
            RagError::Pipeline(format!("retrieval failed: {e}"))
        })?;
        Ok(ranker::rank(matches, k))
    }
}

/// Builder for constructing a [`Pipeline`].
///
/// All fields are required; [`build()`](PipelineBuilder::build) validates
/// their presence.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    index: Option<Arc<EmbeddingIndex>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding index.
    pub fn index(mut self, index: Arc<EmbeddingIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`Pipeline`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<Pipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| RagError::Config("index is required".to_string()))?;
        Ok(Pipeline { config, chunker, index })
    }
}
