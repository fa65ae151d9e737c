//! Relevance scoring for raw search matches.
//!
//! The store returns matches ordered by ascending cosine distance; this
//! module derives a similarity-oriented score from each distance and
//! truncates to the requested result count. It never re-sorts: the
//! store's ordering is the ranking.

use crate::document::{RawMatch, SearchResult};

/// Convert raw distance matches into ranked results.
///
/// Preserves the incoming order, derives
/// `relevance_score = 1.0 - distance` per match, and truncates to at
/// most `limit` results. Under the cosine metric the score lies in
/// `[-1, 1]`; callers must not assume it is non-negative.
pub fn rank(matches: Vec<RawMatch>, limit: usize) -> Vec<SearchResult> {
    matches
        .into_iter()
        .take(limit)
        .map(|m| SearchResult {
            relevance_score: 1.0 - m.distance,
            content: m.content,
            metadata: m.metadata,
            distance: m.distance,
        })
        .collect()
}
