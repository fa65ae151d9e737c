//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// A provider that generates fixed-length vector embeddings from text.
///
/// The batch method is the primary interface: the pipeline embeds all
/// chunks of a document load in a single call to amortize per-request
/// overhead, so backends should make [`embed_batch`](EmbeddingProvider::embed_batch)
/// as efficient as they can. Every vector returned must have exactly
/// [`dimensions()`](EmbeddingProvider::dimensions) elements; a collection
/// is bound to that dimensionality for its lifetime.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Must return one vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding vector for a single text input.
    ///
    /// The default implementation delegates to a batch of one.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors.pop().ok_or_else(|| RagError::Embedding {
            provider: "unknown".to_string(),
            message: "provider returned no vector for a single-input batch".to_string(),
        })
    }

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
