//! trellis-core - Core library for trellis.
//!
//! This crate provides the error type, configuration, shared types,
//! backend traits, and the linear workflow runner the trellis pipelines
//! are built from.
//!
//! # Example
//!
//! ```ignore
//! use trellis_core::workflow::{FnNode, StateGraph};
//!
//! let compiled = StateGraph::new()
//!     .add_node("double", FnNode::new(|state: i32| Ok(state * 2)))
//!     .set_entry_point("double")
//!     .compile()?;
//!
//! let result = compiled.invoke(21).await?;
//! ```

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use config::{LlmProvider, LlmProviderConfig, SplitterConfig, TrellisConfig};
pub use error::{TrellisError, TrellisResult};
pub use traits::{
    CategorizedEntities, GenerationOptions, GraphUpdater, Llm, LlmConfig, LlmResponse, Ner,
    RelationExtractor, ResponseFormat,
};
pub use types::{
    ChatMessage, EntityCategory, EntityProperties, FeedbackRecord, MessageRole, PromptMessage,
    RelationTriple, Subgraph, DEFAULT_RELATION,
};
pub use workflow::{CompiledGraph, FnNode, Node, StateGraph};
