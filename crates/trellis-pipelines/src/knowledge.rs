//! Knowledge-graph pipeline: build -> analyze.

use async_trait::async_trait;

use trellis_core::error::TrellisResult;
use trellis_core::types::{EntityProperties, RelationTriple};
use trellis_core::workflow::{CompiledGraph, Node, StateGraph};
use trellis_graph::{analyze, GraphMetrics, KnowledgeGraph};

/// State threaded through the knowledge-graph pipeline.
#[derive(Debug, Default)]
pub struct KgState {
    /// Input entity map (name -> properties).
    pub entities: EntityProperties,
    /// Input relation triples.
    pub relations: Vec<RelationTriple>,
    /// The constructed graph.
    pub graph: KnowledgeGraph,
    /// Derived metrics.
    pub metrics: GraphMetrics,
}

impl KgState {
    /// Create a fresh state from graph inputs.
    pub fn new(entities: EntityProperties, relations: Vec<RelationTriple>) -> Self {
        Self {
            entities,
            relations,
            ..Default::default()
        }
    }
}

struct BuildNode;

#[async_trait]
impl Node<KgState> for BuildNode {
    async fn run(&self, mut state: KgState) -> TrellisResult<KgState> {
        // Wholesale rebuild: prior graph contents are cleared first.
        let entities = std::mem::take(&mut state.entities);
        let relations = std::mem::take(&mut state.relations);
        state.graph.rebuild(&entities, &relations);
        state.entities = entities;
        state.relations = relations;
        tracing::debug!(
            nodes = state.graph.node_count(),
            edges = state.graph.edge_count(),
            "knowledge graph rebuilt"
        );
        Ok(state)
    }
}

struct AnalyzeNode;

#[async_trait]
impl Node<KgState> for AnalyzeNode {
    async fn run(&self, mut state: KgState) -> TrellisResult<KgState> {
        state.metrics = analyze(&state.graph);
        Ok(state)
    }
}

/// Knowledge-graph construction and analytics pipeline.
pub struct KgPipeline {
    workflow: CompiledGraph<KgState>,
}

impl KgPipeline {
    /// Build the pipeline.
    pub fn new() -> TrellisResult<Self> {
        let workflow = StateGraph::new()
            .add_node("build", BuildNode)
            .add_node("analyze", AnalyzeNode)
            .add_edge("build", "analyze")
            .set_entry_point("build")
            .set_finish_point("analyze")
            .compile()?;
        Ok(Self { workflow })
    }

    /// Run the pipeline over an entity map and relation list.
    pub async fn run(
        &self,
        entities: EntityProperties,
        relations: Vec<RelationTriple>,
    ) -> TrellisResult<KgState> {
        self.workflow.invoke(KgState::new(entities, relations)).await
    }
}
