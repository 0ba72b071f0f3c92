//! trellis-pipelines - Workflow pipeline definitions for trellis.
//!
//! Four linear pipelines over [`trellis_core::workflow::StateGraph`]:
//!
//! - [`DocumentPipeline`]: chunk -> extract_entities -> build_relations
//! - [`KgPipeline`]: build -> analyze
//! - [`RagPipeline`]: retrieve -> generate
//! - [`LearningPipeline`]: process
//!
//! Every external collaborator (splitter, NER, relation extractor,
//! knowledge graph, LLM, graph updater) is injected at construction.
//! The document and knowledge-graph pipelines are intentionally not
//! wired to each other; their states are structurally compatible and a
//! caller can hand one's output to the other.

pub mod document;
pub mod knowledge;
pub mod learning;
pub mod rag;

pub use document::{DocumentPipeline, DocumentState};
pub use knowledge::{KgPipeline, KgState};
pub use learning::{LearningPipeline, LearningState};
pub use rag::{Conversation, RagPipeline, NO_GRAPH_CONTEXT, NO_QUERY, NO_RESPONSE};
