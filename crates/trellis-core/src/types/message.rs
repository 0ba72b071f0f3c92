//! Message types for conversations and LLM prompts.
//!
//! Two representations live here on purpose. [`ChatMessage`] is the
//! conversation state the graph-RAG pipeline threads between nodes; its
//! `GraphContext` variant carries a retrieved subgraph as a first-class
//! payload, resolved by matching. [`PromptMessage`] is the flat
//! role/content form the LLM providers put on the wire.

use serde::{Deserialize, Serialize};

use super::entity::Subgraph;

/// A message in a graph-RAG conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ChatMessage {
    /// A human text query.
    Human(String),
    /// A generated answer.
    Ai(String),
    /// A retrieved subgraph attached to the conversation.
    GraphContext(Subgraph),
}

impl ChatMessage {
    /// Create a human message.
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human(content.into())
    }

    /// Create an AI message.
    pub fn ai(content: impl Into<String>) -> Self {
        Self::Ai(content.into())
    }

    /// Create a graph-context message.
    pub fn graph_context(subgraph: Subgraph) -> Self {
        Self::GraphContext(subgraph)
    }

    /// Text content for `Human` and `Ai` variants; `None` for context.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Human(content) | Self::Ai(content) => Some(content),
            Self::GraphContext(_) => None,
        }
    }

    /// The subgraph payload, if this is a `GraphContext` message.
    pub fn subgraph(&self) -> Option<&Subgraph> {
        match self {
            Self::GraphContext(subgraph) => Some(subgraph),
            _ => None,
        }
    }
}

/// Role of a prompt message sent to an LLM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A role/content message for LLM provider APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

impl PromptMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}
