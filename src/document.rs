//! Data types for documents, chunks, indexed records, and search results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The format a document's text was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Plain text file.
    Txt,
    /// Markdown file.
    Md,
    /// Text extracted from a PDF.
    Pdf,
    /// Text extracted from a DOCX.
    Docx,
    /// Text scraped from a web page.
    Web,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DocumentType::Txt => "txt",
            DocumentType::Md => "md",
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
            DocumentType::Web => "web",
        };
        f.write_str(tag)
    }
}

/// A source document produced by an adapter (file, upload, or URL).
///
/// Documents are consumed once by the chunker and are not persisted
/// themselves; only their chunks are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The raw text content.
    pub content: String,
    /// Source identifier, unique per logical document (e.g. a file path
    /// or URL). Chunk record ids are derived from it.
    pub source: String,
    /// The format the content was extracted from.
    pub doc_type: DocumentType,
}

impl Document {
    /// Create a document from its parts.
    pub fn new(
        content: impl Into<String>,
        source: impl Into<String>,
        doc_type: DocumentType,
    ) -> Self {
        Self { content: content.into(), source: source.into(), doc_type }
    }
}

/// A bounded, overlap-aware segment of a document: the unit of indexing
/// and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The chunk text, trimmed of leading/trailing whitespace.
    pub content: String,
    /// Source identifier inherited from the parent document.
    pub source: String,
    /// Format tag inherited from the parent document.
    pub doc_type: DocumentType,
    /// 0-based, sequential within a document.
    pub chunk_id: usize,
    /// Byte offset of the chunk start in the original content (pre-trim).
    pub start_pos: usize,
    /// Byte offset one past the chunk end in the original content (pre-trim).
    pub end_pos: usize,
}

impl Chunk {
    /// The globally unique record id for this chunk: `{source}_{chunk_id}`.
    ///
    /// Re-adding a chunk with the same id overwrites the prior record, so
    /// re-ingesting a document by source is idempotent.
    pub fn record_id(&self) -> String {
        format!("{}_{}", self.source, self.chunk_id)
    }

    /// The metadata persisted alongside this chunk's text and vector.
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            source: self.source.clone(),
            doc_type: self.doc_type,
            chunk_id: self.chunk_id,
        }
    }
}

/// Metadata stored with every indexed record and returned with every
/// search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// Source identifier of the parent document.
    pub source: String,
    /// Format tag of the parent document.
    pub doc_type: DocumentType,
    /// Chunk index within the parent document.
    pub chunk_id: usize,
}

/// A persisted record owned by a vector store: id, embedding, text, and
/// metadata. Lives from `upsert` until deletion or collection clear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedRecord {
    /// Globally unique id within the collection (`{source}_{chunk_id}`).
    pub id: String,
    /// The embedding vector; length is fixed per collection.
    pub vector: Vec<f32>,
    /// The chunk text.
    pub text: String,
    /// Chunk provenance.
    pub metadata: ChunkMetadata,
}

/// A raw nearest-neighbor hit from a vector store, before relevance
/// scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    /// The stored chunk text.
    pub content: String,
    /// The stored chunk metadata.
    pub metadata: ChunkMetadata,
    /// Cosine distance from the query vector, `>= 0`, in `[0, 2]`.
    pub distance: f32,
}

/// A ranked retrieval result handed to callers (UI or answer generator).
///
/// Ephemeral, produced per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The retrieved chunk text.
    pub content: String,
    /// Provenance of the retrieved chunk.
    pub metadata: ChunkMetadata,
    /// Raw cosine distance from the query (lower is closer).
    pub distance: f32,
    /// `1.0 - distance`. Under the cosine metric this lies in `[-1, 1]`;
    /// callers must not assume it is non-negative.
    pub relevance_score: f32,
}
