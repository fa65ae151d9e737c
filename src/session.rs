//! Explicit application context owned by the caller.
//!
//! There is no process-wide session state in this crate: callers
//! construct a [`ProjectInfo`] once at startup, thread it through their
//! handlers, and keep the conversation in a [`ChatLog`] they own.

use serde::{Deserialize, Serialize};

/// The project a documentation index describes, used to frame generated
/// answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectInfo {
    /// Display name of the project.
    pub name: String,
    /// Short description of what the project does.
    pub description: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: "OpenSource Project".to_string(),
            description: "A comprehensive open-source project with detailed documentation."
                .to_string(),
        }
    }
}

impl ProjectInfo {
    /// Create a project context from its parts.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into() }
    }
}

/// One question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    /// The user's question.
    pub question: String,
    /// The generated answer.
    pub answer: String,
}

/// An ordered log of question/answer exchanges.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatLog {
    turns: Vec<ChatTurn>,
}

impl ChatLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question/answer exchange.
    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ChatTurn { question: question.into(), answer: answer.into() });
    }

    /// The exchanges in chronological order.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Whether the log holds no exchanges.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The number of exchanges.
    pub fn len(&self) -> usize {
        self.turns.len()
    }
}
