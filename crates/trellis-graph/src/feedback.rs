//! Feedback application against the shared knowledge graph.

use async_trait::async_trait;

use trellis_core::error::{TrellisError, TrellisResult};
use trellis_core::traits::GraphUpdater;
use trellis_core::types::FeedbackRecord;

use crate::graph::SharedGraph;

/// Applies feedback corrections to a shared [`KnowledgeGraph`].
///
/// A correction payload of the form
/// `{"entity": "<name>", "properties": {...}}` merges the properties
/// into the named entity, creating it when absent. Payloads without an
/// entity name are logged and skipped; there is no validation, undo, or
/// conflict resolution.
///
/// [`KnowledgeGraph`]: crate::graph::KnowledgeGraph
pub struct GraphFeedbackUpdater {
    graph: SharedGraph,
}

impl GraphFeedbackUpdater {
    /// Create an updater over a shared graph handle.
    pub fn new(graph: SharedGraph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl GraphUpdater for GraphFeedbackUpdater {
    async fn update_with_feedback(&self, record: &FeedbackRecord) -> TrellisResult<()> {
        let Some(correction) = &record.correction else {
            tracing::warn!(query = %record.query, "feedback record carries no correction");
            return Ok(());
        };
        let Some(entity) = correction.get("entity").and_then(|v| v.as_str()) else {
            tracing::warn!(query = %record.query, "feedback correction names no entity");
            return Ok(());
        };

        let properties = correction
            .get("properties")
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));

        let mut graph = self
            .graph
            .write()
            .map_err(|_| TrellisError::graph("knowledge graph lock poisoned"))?;
        graph.upsert_entity(entity, properties);
        tracing::debug!(entity = %entity, "applied feedback correction");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::graph::KnowledgeGraph;
    use trellis_core::types::{EntityProperties, RelationTriple};

    fn shared_graph() -> SharedGraph {
        let mut entities = EntityProperties::new();
        entities.insert(
            "Apple Inc.".to_string(),
            serde_json::json!({"type": "ORG"}),
        );
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(
            &entities,
            &[RelationTriple::new("Apple Inc.", "iPhone", "manufactures")],
        );
        kg.into_shared()
    }

    #[tokio::test]
    async fn test_correction_merges_properties() {
        let graph = shared_graph();
        let updater = GraphFeedbackUpdater::new(Arc::clone(&graph));

        let record = FeedbackRecord::incorrect(
            "where is Apple?",
            "Apple is in Texas",
            serde_json::json!({"entity": "Apple Inc.", "properties": {"hq": "Cupertino"}}),
        );
        updater.update_with_feedback(&record).await.unwrap();

        let kg = graph.read().unwrap();
        let props = kg.entity("Apple Inc.").unwrap();
        assert_eq!(props["type"], "ORG");
        assert_eq!(props["hq"], "Cupertino");
    }

    #[tokio::test]
    async fn test_correction_creates_missing_entity() {
        let graph = shared_graph();
        let updater = GraphFeedbackUpdater::new(Arc::clone(&graph));

        let record = FeedbackRecord::incorrect(
            "who runs Apple?",
            "nobody",
            serde_json::json!({"entity": "Tim Cook", "properties": {"role": "CEO"}}),
        );
        updater.update_with_feedback(&record).await.unwrap();

        let kg = graph.read().unwrap();
        assert!(kg.entity("Tim Cook").is_some());
    }

    #[tokio::test]
    async fn test_correction_without_entity_is_skipped() {
        let graph = shared_graph();
        let updater = GraphFeedbackUpdater::new(Arc::clone(&graph));
        let before = graph.read().unwrap().node_count();

        let record = FeedbackRecord::incorrect(
            "q",
            "a",
            serde_json::json!({"note": "no entity named"}),
        );
        updater.update_with_feedback(&record).await.unwrap();

        assert_eq!(graph.read().unwrap().node_count(), before);
    }
}
