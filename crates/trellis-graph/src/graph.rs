//! In-memory knowledge graph over petgraph.
//!
//! Nodes carry the entity name and a JSON property object; edges carry
//! the relation label. The graph is rebuilt from scratch on every
//! construction call - there is no incremental merge.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use trellis_core::types::{EntityProperties, RelationTriple, Subgraph};

/// Node data: an entity and its properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityNode {
    /// Entity name.
    pub name: String,
    /// Additional properties as JSON.
    pub properties: serde_json::Value,
}

impl EntityNode {
    /// Create a new entity node with empty properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Set properties.
    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = properties;
        self
    }
}

/// Edge data: the relation label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Relation label (e.g., "manufactures", "headquartered_in").
    pub relation: String,
}

/// Shared handle for the long-lived graph the RAG and learning
/// pipelines borrow.
pub type SharedGraph = Arc<RwLock<KnowledgeGraph>>;

/// The in-memory knowledge graph.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<EntityNode, RelationEdge>,
    name_index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the graph in a shared handle.
    pub fn into_shared(self) -> SharedGraph {
        Arc::new(RwLock::new(self))
    }

    /// Clear all nodes and edges.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.name_index.clear();
    }

    /// Rebuild the graph wholesale from an entity map and relation list.
    ///
    /// Clears prior state first, so repeated calls with the same inputs
    /// yield identical node and edge sets. Triples naming an entity
    /// absent from the map create that node with empty properties; an
    /// empty relation label falls back to the default.
    pub fn rebuild(&mut self, entities: &EntityProperties, relations: &[RelationTriple]) {
        self.clear();

        for (name, properties) in entities {
            let node = EntityNode::new(name).with_properties(properties.clone());
            let idx = self.graph.add_node(node);
            self.name_index.insert(name.clone(), idx);
        }

        for rel in relations {
            let source = self.get_or_create(&rel.source);
            let target = self.get_or_create(&rel.target);
            self.graph.add_edge(
                source,
                target,
                RelationEdge {
                    relation: rel.relation_or_default().to_string(),
                },
            );
        }
    }

    fn get_or_create(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.name_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(EntityNode::new(name));
        self.name_index.insert(name.to_string(), idx);
        idx
    }

    /// Insert or update an entity, merging the given properties over any
    /// existing ones.
    pub fn upsert_entity(&mut self, name: &str, properties: serde_json::Value) {
        let idx = self.get_or_create(name);
        let node = &mut self.graph[idx];
        match (&mut node.properties, properties) {
            (serde_json::Value::Object(existing), serde_json::Value::Object(new)) => {
                for (key, value) in new {
                    existing.insert(key, value);
                }
            }
            (slot, replacement) => *slot = replacement,
        }
    }

    /// Number of entities.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of relations.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Entity names in sorted order.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .graph
            .node_weights()
            .map(|node| node.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Properties of a named entity, if present.
    pub fn entity(&self, name: &str) -> Option<&serde_json::Value> {
        self.name_index
            .get(name)
            .map(|&idx| &self.graph[idx].properties)
    }

    /// All relations as triples, in sorted order.
    pub fn edge_triples(&self) -> Vec<RelationTriple> {
        let mut triples: Vec<RelationTriple> = self
            .graph
            .edge_references()
            .map(|edge| {
                RelationTriple::new(
                    self.graph[edge.source()].name.clone(),
                    self.graph[edge.target()].name.clone(),
                    edge.weight().relation.clone(),
                )
            })
            .collect();
        triples.sort_by(|a, b| {
            (&a.source, &a.target, &a.relation).cmp(&(&b.source, &b.target, &b.relation))
        });
        triples
    }

    /// Access the underlying petgraph structure.
    pub fn graph(&self) -> &DiGraph<EntityNode, RelationEdge> {
        &self.graph
    }

    /// Retrieve the subgraph relevant to a text query.
    ///
    /// Matches node names against the query by case-insensitive
    /// substring containment in either direction, then expands to the
    /// one-hop neighborhood. All edges among the collected node set are
    /// included. No ranking; an unmatched query yields an empty
    /// subgraph.
    pub fn query(&self, text: &str) -> Subgraph {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Subgraph::default();
        }

        let mut selected: BTreeSet<NodeIndex> = BTreeSet::new();
        for idx in self.graph.node_indices() {
            let name = self.graph[idx].name.to_lowercase();
            if needle.contains(&name) || name.contains(&needle) {
                selected.insert(idx);
                for neighbor in self
                    .graph
                    .neighbors_undirected(idx)
                    .collect::<Vec<_>>()
                {
                    selected.insert(neighbor);
                }
            }
        }

        let mut subgraph = Subgraph::default();
        for &idx in &selected {
            let node = &self.graph[idx];
            subgraph
                .entities
                .insert(node.name.clone(), node.properties.clone());
        }
        for edge in self.graph.edge_references() {
            if selected.contains(&edge.source()) && selected.contains(&edge.target()) {
                subgraph.relations.push(RelationTriple::new(
                    self.graph[edge.source()].name.clone(),
                    self.graph[edge.target()].name.clone(),
                    edge.weight().relation.clone(),
                ));
            }
        }
        subgraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> (EntityProperties, Vec<RelationTriple>) {
        let mut entities = EntityProperties::new();
        entities.insert(
            "Apple Inc.".to_string(),
            serde_json::json!({"type": "ORG"}),
        );
        entities.insert("iPhone".to_string(), serde_json::json!({"type": "PRODUCT"}));
        entities.insert(
            "Cupertino".to_string(),
            serde_json::json!({"type": "GPE"}),
        );
        let relations = vec![
            RelationTriple::new("Apple Inc.", "iPhone", "manufactures"),
            RelationTriple::new("Apple Inc.", "Cupertino", "headquartered_in"),
        ];
        (entities, relations)
    }

    #[test]
    fn test_rebuild_adds_nodes_and_edges() {
        let (entities, relations) = sample_inputs();
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(&entities, &relations);

        assert_eq!(kg.node_count(), 3);
        assert_eq!(kg.edge_count(), 2);
        assert_eq!(
            kg.entity("Apple Inc."),
            Some(&serde_json::json!({"type": "ORG"}))
        );
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let (entities, relations) = sample_inputs();
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(&entities, &relations);
        let nodes_first = kg.node_names();
        let edges_first = kg.edge_triples();

        kg.rebuild(&entities, &relations);
        assert_eq!(kg.node_names(), nodes_first);
        assert_eq!(kg.edge_triples(), edges_first);
    }

    #[test]
    fn test_rebuild_creates_missing_endpoints() {
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(
            &EntityProperties::new(),
            &[RelationTriple::new("A", "B", "linked")],
        );
        assert_eq!(kg.node_count(), 2);
        assert_eq!(kg.edge_count(), 1);
        assert!(kg.entity("A").is_some());
    }

    #[test]
    fn test_missing_relation_label_defaults() {
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(
            &EntityProperties::new(),
            &[RelationTriple::new("A", "B", "")],
        );
        let triples = kg.edge_triples();
        assert_eq!(triples[0].relation, "related");
    }

    #[test]
    fn test_query_returns_one_hop_neighborhood() {
        let (entities, relations) = sample_inputs();
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(&entities, &relations);

        let subgraph = kg.query("What does Apple Inc. manufacture?");
        assert!(subgraph.entities.contains_key("Apple Inc."));
        assert!(subgraph.entities.contains_key("iPhone"));
        assert!(subgraph.entities.contains_key("Cupertino"));
        assert_eq!(subgraph.relations.len(), 2);
    }

    #[test]
    fn test_query_unknown_term_is_empty() {
        let (entities, relations) = sample_inputs();
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(&entities, &relations);

        assert!(kg.query("quantum chromodynamics").is_empty());
        assert!(kg.query("   ").is_empty());
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let (entities, relations) = sample_inputs();
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(&entities, &relations);

        let subgraph = kg.query("tell me about the IPHONE");
        assert!(subgraph.entities.contains_key("iPhone"));
    }

    #[test]
    fn test_upsert_merges_properties() {
        let (entities, relations) = sample_inputs();
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(&entities, &relations);

        kg.upsert_entity("Apple Inc.", serde_json::json!({"founded": 1976}));
        let props = kg.entity("Apple Inc.").unwrap();
        assert_eq!(props["type"], "ORG");
        assert_eq!(props["founded"], 1976);

        kg.upsert_entity("Tim Cook", serde_json::json!({"role": "CEO"}));
        assert_eq!(kg.node_count(), 4);
    }
}
