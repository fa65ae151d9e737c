//! Ollama-backed embedding and answer generation.
//!
//! This module is only available when the `ollama` feature is enabled.
//! It talks to a local Ollama server over HTTP: `/api/embeddings` for
//! vectors and `/api/generate` for answers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::AnswerGenerator;
use crate::session::ProjectInfo;

/// The default Ollama server address.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default embedding model and its dimensionality.
const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
const DEFAULT_EMBED_DIMENSIONS: usize = 768;

/// The default chat model for answer generation.
const DEFAULT_CHAT_MODEL: &str = "llama2:7b-chat";

/// How many retrieved results are quoted in the prompt, and how much of
/// each.
const CONTEXT_RESULTS: usize = 3;
const CONTEXT_SNIPPET_BYTES: usize = 500;

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::Embedding { provider: "Ollama".to_string(), message: message.into() }
}

fn generation_error(message: impl Into<String>) -> RagError {
    RagError::Generation { provider: "Ollama".to_string(), message: message.into() }
}

/// An [`EmbeddingProvider`] backed by a local Ollama server.
///
/// The Ollama embeddings endpoint takes one prompt per request, so
/// batches are issued as sequential requests against the local server.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::ollama::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new();
/// let vector = provider.embed("hello world").await?;
/// ```
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl Default for OllamaEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaEmbeddingProvider {
    /// Create a provider against `http://localhost:11434` with the
    /// default model (`nomic-embed-text`, 768 dimensions).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_EMBED_MODEL.to_string(),
            dimensions: DEFAULT_EMBED_DIMENSIONS,
        }
    }

    /// Set the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the embedding model and the dimensionality it produces.
    ///
    /// A collection embedded with one model cannot be reopened with a
    /// model of a different dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest { model: &self.model, prompt: text };
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| embedding_error(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(embedding_error(format!("server returned {}", response.status())));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| embedding_error(format!("malformed response: {e}")))?;

        if body.embedding.len() != self.dimensions {
            return Err(embedding_error(format!(
                "model '{}' returned {} dimensions, expected {}",
                self.model,
                body.embedding.len(),
                self.dimensions
            )));
        }
        Ok(body.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        debug!(model = %self.model, batch_size = texts.len(), "embedding batch");
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed_one(text).await.map_err(|e| {
                error!(model = %self.model, error = %e, "embedding request failed");
                e
            })?);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// An [`AnswerGenerator`] backed by a local Ollama chat model.
///
/// Builds a prompt that frames the model as a documentation assistant
/// for the configured project, quotes the top retrieved results, and
/// requests a single non-streamed completion.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

impl Default for OllamaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaGenerator {
    /// Create a generator against `http://localhost:11434` with the
    /// default chat model.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 1000,
        }
    }

    /// Set the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the chat model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_prompt(&self, question: &str, context: &[SearchResult], project: &ProjectInfo) -> String {
        let context_str = if context.is_empty() {
            "No documentation loaded yet.".to_string()
        } else {
            context
                .iter()
                .take(CONTEXT_RESULTS)
                .map(|result| {
                    let mut snippet = result.content.as_str();
                    if snippet.len() > CONTEXT_SNIPPET_BYTES {
                        let mut cut = CONTEXT_SNIPPET_BYTES;
                        while !snippet.is_char_boundary(cut) {
                            cut -= 1;
                        }
                        snippet = &snippet[..cut];
                    }
                    format!("Document: {}\nContent: {snippet}...", result.metadata.source)
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        format!(
            "You are a helpful documentation assistant for {name}.\n\n\
             {description}\n\n\
             Instructions:\n\
             - Answer questions clearly and concisely\n\
             - Use the provided context when available\n\
             - If context is provided, prioritize information from the context\n\
             - If no context is available, use your general knowledge about {name}\n\
             - Always be helpful and informative\n\
             - If you don't know something, say so honestly\n\
             - Format your responses in a user-friendly way with proper markdown when helpful\n\n\
             Context: {context_str}\n\n\
             User Question: {question}\n",
            name = project.name,
            description = project.description,
        )
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    async fn generate(
        &self,
        question: &str,
        context: &[SearchResult],
        project: &ProjectInfo,
    ) -> Result<String> {
        let prompt = self.build_prompt(question, context, project);
        debug!(model = %self.model, context_len = context.len(), "generating answer");

        let request = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                top_p: self.top_p,
                num_predict: self.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| generation_error(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(generation_error(format!("server returned {}", response.status())));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| generation_error(format!("malformed response: {e}")))?;

        Ok(body.response.trim().to_string())
    }
}
