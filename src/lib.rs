//! Document indexing and retrieval for retrieval-augmented question
//! answering.
//!
//! `docrag` ingests documents, splits them into overlapping,
//! boundary-aware chunks, embeds them through a pluggable
//! [`EmbeddingProvider`], stores them in a pluggable [`VectorStore`],
//! and at query time returns the nearest chunks ranked by a bounded
//! relevance score — ready to ground a language-model answer.
//!
//! # Architecture
//!
//! - [`SentenceChunker`] splits documents at sentence/line boundaries
//!   with configurable size and overlap.
//! - [`EmbeddingIndex`] binds one embedding provider and one store
//!   collection; records are keyed `{source}_{chunk_id}`, so
//!   re-ingesting a document overwrites its prior chunks.
//! - [`MemoryStore`] and [`DiskStore`] are the built-in backends; the
//!   disk backend persists each collection as one JSON file and
//!   recovers it on reopen.
//! - [`Pipeline`] coordinates the two paths: chunk → embed (one batch
//!   per load) → store, and embed → search → rank.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docrag::{
//!     DiskStore, Document, DocumentType, EmbeddingIndex, Pipeline, RagConfig, SentenceChunker,
//! };
//!
//! let config = RagConfig::default();
//! let store = Arc::new(DiskStore::open("./embeddings").await?);
//! let index = EmbeddingIndex::open(store, provider, "documentation").await?;
//!
//! let pipeline = Pipeline::builder()
//!     .config(config.clone())
//!     .chunker(Arc::new(SentenceChunker::new(config.chunk_size, config.chunk_overlap)?))
//!     .index(Arc::new(index))
//!     .build()?;
//!
//! pipeline.ingest(&[Document::new("...", "guide.md", DocumentType::Md)]).await?;
//! let results = pipeline.retrieve("how do I get started?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod disk;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod loader;
pub mod memory;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod pipeline;
pub mod ranker;
pub mod session;
pub mod store;

pub use chunking::{Chunker, SentenceChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use disk::DiskStore;
pub use document::{
    Chunk, ChunkMetadata, Document, DocumentType, IndexedRecord, RawMatch, SearchResult,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::AnswerGenerator;
pub use index::EmbeddingIndex;
pub use loader::DocumentLoader;
pub use memory::MemoryStore;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use session::{ChatLog, ChatTurn, ProjectInfo};
pub use store::VectorStore;
