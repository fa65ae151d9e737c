//! Boundary-aware document chunking.
//!
//! The [`Chunker`] trait is the splitting seam of the pipeline;
//! [`SentenceChunker`] is the default implementation. It splits by byte
//! count with configurable overlap, preferring to cut just after a
//! sentence terminator or newline found in the last 30% of the window
//! rather than at the hard size boundary.

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations never fail: a document with empty content yields an
/// empty `Vec`, so one malformed document cannot abort a batch load.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered chunks with 0-based sequential ids.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into overlapping chunks, cutting at sentence or line
/// boundaries when one falls in the last 30% of the chunk window.
///
/// Positions are byte offsets into the document content, snapped to
/// UTF-8 character boundaries so multi-byte text never splits a
/// character. Chunk text is trimmed of surrounding whitespace but
/// `start_pos`/`end_pos` record the pre-trim span.
///
/// # Example
///
/// ```rust,ignore
/// use docrag::SentenceChunker;
///
/// let chunker = SentenceChunker::new(1000, 200)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceChunker {
    /// Create a new `SentenceChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`; with such parameters the split
    /// loop could not advance, so the input is rejected up front.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

/// Snap a byte offset backward to the nearest UTF-8 character boundary.
fn snap_back(text: &str, mut pos: usize) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

impl Chunker for SentenceChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let content = document.content.as_str();
        if content.is_empty() {
            return Vec::new();
        }

        let len = content.len();
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_id = 0;

        while start < len {
            let mut end = snap_back(content, (start + self.chunk_size).min(len));

            // Only look for a natural boundary when this is a true split
            // point, not the end of the document.
            if end < len {
                let window_start =
                    snap_back(content, (start + self.chunk_size * 7 / 10).min(end));
                let window = &content[window_start..end];
                // A sentence terminator wins over a newline when both exist.
                if let Some(pos) = window.rfind('.') {
                    end = window_start + pos + 1;
                } else if let Some(pos) = window.rfind('\n') {
                    end = window_start + pos + 1;
                }
            }

            // Multi-byte snapping can collapse the window; force at least
            // one character of progress.
            if end <= start {
                end = content[start..]
                    .char_indices()
                    .nth(1)
                    .map(|(i, _)| start + i)
                    .unwrap_or(len);
            }

            chunks.push(Chunk {
                content: content[start..end].trim().to_string(),
                source: document.source.clone(),
                doc_type: document.doc_type,
                chunk_id,
                start_pos: start,
                end_pos: end,
            });
            chunk_id += 1;

            if end >= len {
                break;
            }
            let next = snap_back(content, end.saturating_sub(self.chunk_overlap));
            start = if next > start { next } else { end };
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentType;

    fn doc(content: &str) -> Document {
        Document::new(content, "test.txt", DocumentType::Txt)
    }

    #[test]
    fn empty_content_yields_no_chunks() {
        let chunker = SentenceChunker::new(100, 20).unwrap();
        assert!(chunker.chunk(&doc("")).is_empty());
    }

    #[test]
    fn short_content_yields_one_trimmed_chunk() {
        let chunker = SentenceChunker::new(100, 20).unwrap();
        let chunks = chunker.chunk(&doc("  hello world  "));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "hello world");
        assert_eq!(chunks[0].chunk_id, 0);
        assert_eq!(chunks[0].start_pos, 0);
        assert_eq!(chunks[0].end_pos, 15);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(SentenceChunker::new(0, 0).is_err());
        assert!(SentenceChunker::new(10, 10).is_err());
        assert!(SentenceChunker::new(10, 15).is_err());
    }

    #[test]
    fn cuts_at_sentence_boundary_in_window() {
        // "A. B. C." with size 5, overlap 1: the first window [3, 5)
        // contains a period, so the first chunk ends just after it.
        let chunker = SentenceChunker::new(5, 1).unwrap();
        let chunks = chunker.chunk(&doc("A. B. C."));
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].content, "A. B.");
        assert_eq!(chunks[0].end_pos, 5);
    }

    #[test]
    fn prefers_period_over_newline() {
        // Both a period and a later newline fall in the search window;
        // the period wins.
        let content = "aaaaaaaa.\nbb cc";
        let chunker = SentenceChunker::new(12, 2).unwrap();
        let chunks = chunker.chunk(&doc(content));
        assert_eq!(chunks[0].end_pos, 9);
        assert_eq!(chunks[0].content, "aaaaaaaa.");
    }

    #[test]
    fn falls_back_to_newline_then_hard_boundary() {
        let with_newline = "aaaaaaaaa\nbb ccc";
        let chunker = SentenceChunker::new(12, 2).unwrap();
        let chunks = chunker.chunk(&doc(with_newline));
        assert_eq!(chunks[0].end_pos, 10);

        let no_boundary = "aaaaaaaaaaaaaaaa";
        let chunks = chunker.chunk(&doc(no_boundary));
        assert_eq!(chunks[0].end_pos, 12);
    }

    #[test]
    fn consecutive_chunks_overlap_and_advance() {
        let content = "x".repeat(250);
        let chunker = SentenceChunker::new(100, 20).unwrap();
        let chunks = chunker.chunk(&doc(&content));
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            assert!(pair[1].start_pos < pair[0].end_pos, "overlap region must be non-empty");
            assert!(pair[1].start_pos > pair[0].start_pos, "chunks must advance");
        }
        // Spans cover the whole document with no gaps.
        assert_eq!(chunks[0].start_pos, 0);
        assert_eq!(chunks.last().unwrap().end_pos, content.len());
        for pair in chunks.windows(2) {
            assert!(pair[1].start_pos <= pair[0].end_pos);
        }
    }

    #[test]
    fn chunk_ids_are_sequential() {
        let content = "word ".repeat(100);
        let chunker = SentenceChunker::new(50, 10).unwrap();
        let chunks = chunker.chunk(&doc(&content));
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, i);
        }
    }

    #[test]
    fn multibyte_content_does_not_panic() {
        let content = "héllo wörld. ".repeat(30);
        let chunker = SentenceChunker::new(37, 9).unwrap();
        let chunks = chunker.chunk(&doc(&content));
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.start_pos < chunk.end_pos);
            // Slicing at recorded offsets must hit char boundaries.
            let _ = &content[chunk.start_pos..chunk.end_pos];
        }
    }

    #[test]
    fn tiny_chunk_size_on_multibyte_text_makes_progress() {
        let content = "ééééé";
        let chunker = SentenceChunker::new(1, 0).unwrap();
        let chunks = chunker.chunk(&doc(content));
        assert_eq!(chunks.len(), 5);
    }
}
