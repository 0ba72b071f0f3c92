//! trellis-graph - Knowledge graph layer for trellis.
//!
//! An in-memory petgraph-backed knowledge graph with wholesale rebuild
//! semantics, degree-centrality and community analytics, substring
//! subgraph retrieval, feedback-driven updates, LLM-based entity
//! extraction, and an interactive HTML renderer.
//!
//! # Example
//!
//! ```ignore
//! use trellis_graph::{analyze, KnowledgeGraph};
//!
//! let mut kg = KnowledgeGraph::new();
//! kg.rebuild(&entities, &relations);
//! let metrics = analyze(&kg);
//! let subgraph = kg.query("What does Apple Inc. manufacture?");
//! ```

pub mod analytics;
pub mod extractor;
pub mod feedback;
pub mod graph;
pub mod viz;

pub use analytics::{analyze, degree_centrality, greedy_modularity_communities, GraphMetrics};
pub use extractor::{ExtractedEntity, ExtractionResult, LlmEntityExtractor};
pub use feedback::GraphFeedbackUpdater;
pub use graph::{EntityNode, KnowledgeGraph, RelationEdge, SharedGraph};
pub use viz::render_html;
