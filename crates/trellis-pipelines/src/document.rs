//! Document ingestion pipeline: chunk -> extract_entities -> build_relations.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use trellis_core::error::TrellisResult;
use trellis_core::traits::{CategorizedEntities, Ner, RelationExtractor};
use trellis_core::types::RelationTriple;
use trellis_core::workflow::{CompiledGraph, Node, StateGraph};
use trellis_extract::{CooccurrenceExtractor, KeywordNer, RecursiveSplitter};

/// State threaded through the document ingestion pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentState {
    /// The raw input text.
    pub raw_text: String,
    /// Derived chunks, in document order.
    pub chunks: Vec<String>,
    /// Extracted entities, accumulated per category across chunks.
    pub entities: CategorizedEntities,
    /// Extracted relation triples.
    pub relations: Vec<RelationTriple>,
    /// Optional summary.
    pub summary: Option<String>,
}

impl DocumentState {
    /// Create a fresh state for a document.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Default::default()
        }
    }
}

struct ChunkNode {
    splitter: Arc<RecursiveSplitter>,
}

#[async_trait]
impl Node<DocumentState> for ChunkNode {
    async fn run(&self, mut state: DocumentState) -> TrellisResult<DocumentState> {
        state.chunks = self.splitter.split_text(&state.raw_text);
        tracing::debug!(chunks = state.chunks.len(), "chunked document");
        Ok(state)
    }
}

struct ExtractEntitiesNode {
    ner: Arc<dyn Ner>,
}

#[async_trait]
impl Node<DocumentState> for ExtractEntitiesNode {
    async fn run(&self, mut state: DocumentState) -> TrellisResult<DocumentState> {
        for chunk in &state.chunks {
            let extracted = self.ner.extract(chunk).await?;
            for (category, surfaces) in extracted {
                state.entities.entry(category).or_default().extend(surfaces);
            }
        }
        Ok(state)
    }
}

struct BuildRelationsNode {
    extractor: Arc<dyn RelationExtractor>,
}

#[async_trait]
impl Node<DocumentState> for BuildRelationsNode {
    async fn run(&self, mut state: DocumentState) -> TrellisResult<DocumentState> {
        state.relations = self.extractor.extract(&state.chunks).await?;
        Ok(state)
    }
}

/// Document ingestion pipeline.
pub struct DocumentPipeline {
    workflow: CompiledGraph<DocumentState>,
}

impl DocumentPipeline {
    /// Build a pipeline with explicit collaborators.
    pub fn new(
        splitter: RecursiveSplitter,
        ner: Arc<dyn Ner>,
        relation_extractor: Arc<dyn RelationExtractor>,
    ) -> TrellisResult<Self> {
        let workflow = StateGraph::new()
            .add_node(
                "chunk",
                ChunkNode {
                    splitter: Arc::new(splitter),
                },
            )
            .add_node("extract_entities", ExtractEntitiesNode { ner })
            .add_node(
                "build_relations",
                BuildRelationsNode {
                    extractor: relation_extractor,
                },
            )
            .add_edge("chunk", "extract_entities")
            .add_edge("extract_entities", "build_relations")
            .set_entry_point("chunk")
            .set_finish_point("build_relations")
            .compile()?;
        Ok(Self { workflow })
    }

    /// Build a pipeline with the default splitter and keyword extractors.
    pub fn with_defaults() -> TrellisResult<Self> {
        Self::new(
            RecursiveSplitter::default(),
            Arc::new(KeywordNer::with_defaults()),
            Arc::new(CooccurrenceExtractor::with_defaults()),
        )
    }

    /// Run the pipeline over raw text.
    pub async fn run(&self, text: &str) -> TrellisResult<DocumentState> {
        self.workflow.invoke(DocumentState::new(text)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::types::EntityCategory;

    #[tokio::test]
    async fn test_unrecognized_text_yields_empty_structures() {
        let pipeline = DocumentPipeline::with_defaults().unwrap();
        let state = pipeline.run("A quiet sentence about nothing.").await.unwrap();

        assert!(!state.chunks.is_empty());
        assert!(state.entities.is_empty());
        assert!(state.relations.is_empty());
    }

    #[tokio::test]
    async fn test_empty_text_still_produces_a_chunk() {
        let pipeline = DocumentPipeline::with_defaults().unwrap();
        let state = pipeline.run("").await.unwrap();
        assert_eq!(state.chunks, vec![String::new()]);
    }

    #[tokio::test]
    async fn test_cooccurring_keywords_emit_relation() {
        let pipeline = DocumentPipeline::with_defaults().unwrap();
        let state = pipeline
            .run("Apple Inc. announced a new iPhone model today.")
            .await
            .unwrap();

        assert!(state.relations.contains(&RelationTriple::new(
            "Apple Inc.",
            "iPhone",
            "manufactures"
        )));
        assert!(state
            .entities
            .get(&EntityCategory::Org)
            .is_some_and(|orgs| orgs.contains(&"Apple Inc.".to_string())));
    }

    #[tokio::test]
    async fn test_entities_accumulate_across_chunks() {
        let pipeline = DocumentPipeline::with_defaults().unwrap();
        // Paragraph breaks and a long filler force multiple chunks; the
        // ORG keyword appears in two of them, so its surface repeats
        // (no dedup).
        let filler = "filler text ".repeat(40);
        let text = format!(
            "Apple Inc. builds phones.\n\n{}\n\nApple Inc. builds tablets too.",
            filler
        );
        let state = pipeline.run(&text).await.unwrap();
        assert!(state.chunks.len() > 1);

        let orgs = state.entities.get(&EntityCategory::Org).unwrap();
        // One entry per chunk containing the keyword; overlap carryover
        // can repeat a mention, so at least the two source chunks count.
        assert!(orgs.iter().filter(|name| *name == "Apple Inc.").count() >= 2);
    }
}
