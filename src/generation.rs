//! Answer generation seam.
//!
//! The pipeline's job ends at ranked retrieval results; turning them
//! into a natural-language answer belongs to an [`AnswerGenerator`]
//! implementation (a local or remote language model client).

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::error::Result;
use crate::session::ProjectInfo;

/// Generates a natural-language answer from a question and its
/// retrieved context.
///
/// The call is treated as a single blocking request/response; timeout
/// and cancellation are the caller's concern. An empty `context` slice
/// means no documentation was retrieved and the generator should fall
/// back to ungrounded answering.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Answer `question` grounded in `context`, framed for `project`.
    async fn generate(
        &self,
        question: &str,
        context: &[SearchResult],
        project: &ProjectInfo,
    ) -> Result<String>;
}
