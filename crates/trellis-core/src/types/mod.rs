//! Shared types for trellis pipelines.

mod entity;
mod feedback;
mod message;

pub use entity::{
    EntityCategory, EntityProperties, RelationTriple, Subgraph, DEFAULT_RELATION,
};
pub use feedback::FeedbackRecord;
pub use message::{ChatMessage, MessageRole, PromptMessage};
