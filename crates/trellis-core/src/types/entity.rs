//! Entity, relation, and subgraph types shared by the pipelines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Relation label substituted when a triple carries none.
pub const DEFAULT_RELATION: &str = "related";

/// Category labels for extracted entities.
///
/// The labels follow the NER convention the extraction pipeline emits
/// (ORG, GPE, PRODUCT, ...); `Concept` is the fallback for output the
/// LLM extractor cannot classify.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum EntityCategory {
    /// An organization (e.g., "Apple Inc.").
    Org,
    /// A geopolitical entity (e.g., "Cupertino", "California").
    Gpe,
    /// A product (e.g., "iPhone").
    Product,
    /// A person.
    Person,
    /// An event.
    Event,
    /// An abstract concept; fallback for unclassified extractor output.
    Concept,
}

impl EntityCategory {
    /// Parse a category with flexible matching over common NER and LLM
    /// output variants. Returns `None` for unrecognized labels.
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "org" | "organization" | "organisation" | "company" | "corporation" => Some(Self::Org),
            "gpe" | "location" | "place" | "city" | "country" | "region" => Some(Self::Gpe),
            "product" | "prod" | "device" | "goods" => Some(Self::Product),
            "person" | "per" | "people" | "individual" => Some(Self::Person),
            "event" | "evt" | "occasion" => Some(Self::Event),
            "concept" | "idea" | "topic" | "misc" => Some(Self::Concept),
            _ => None,
        }
    }

    /// All category variants, for extraction prompts.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

/// A labeled directed link between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationTriple {
    /// Source entity name.
    pub source: String,
    /// Target entity name.
    pub target: String,
    /// Relation label (e.g., "manufactures", "headquartered_in").
    pub relation: String,
}

impl RelationTriple {
    /// Create a new relation triple.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
        }
    }

    /// The relation label, or [`DEFAULT_RELATION`] when empty.
    pub fn relation_or_default(&self) -> &str {
        if self.relation.trim().is_empty() {
            DEFAULT_RELATION
        } else {
            &self.relation
        }
    }
}

/// Mapping from entity name to its property object.
pub type EntityProperties = BTreeMap<String, serde_json::Value>;

/// A retrieved portion of the knowledge graph relevant to a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    /// Entities in the subgraph, keyed by name.
    pub entities: EntityProperties,
    /// Relations among the entities.
    pub relations: Vec<RelationTriple>,
}

impl Subgraph {
    /// Check whether the subgraph carries no entities and no relations.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }

    /// Render the subgraph as a plain-text facts block for LLM prompts.
    pub fn to_facts_block(&self) -> String {
        let mut lines = Vec::new();
        for name in self.entities.keys() {
            lines.push(format!("- entity: {}", name));
        }
        for rel in &self.relations {
            lines.push(format!(
                "- {} --[{}]--> {}",
                rel.source,
                rel.relation_or_default(),
                rel.target
            ));
        }
        lines.join("\n")
    }
}
