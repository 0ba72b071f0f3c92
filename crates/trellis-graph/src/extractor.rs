//! LLM-based entity and relation extraction.
//!
//! Prompts an injected `Llm` for strict-JSON entities and relations and
//! parses the response leniently: markdown code fences are stripped,
//! single quotes and trailing commas tolerated, unknown entity
//! categories fall back to `Concept` and unknown relation labels to the
//! default. Unparseable output degrades to an empty result rather than
//! an error.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use trellis_core::error::TrellisResult;
use trellis_core::traits::{GenerationOptions, Llm, ResponseFormat};
use trellis_core::types::{
    EntityCategory, EntityProperties, PromptMessage, RelationTriple, DEFAULT_RELATION,
};

/// An entity extracted from text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    /// The entity name.
    pub name: String,
    /// The entity category.
    pub category: EntityCategory,
    /// Optional description or context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExtractedEntity {
    /// Create a new extracted entity.
    pub fn new(name: impl Into<String>, category: EntityCategory) -> Self {
        Self {
            name: name.into(),
            category,
            description: None,
        }
    }

    /// Add a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Result of entity extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted entities.
    pub entities: Vec<ExtractedEntity>,
    /// Extracted relations.
    pub relations: Vec<RelationTriple>,
}

impl ExtractionResult {
    /// Check if the result is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }

    /// Convert into the inputs `KnowledgeGraph::rebuild` consumes.
    pub fn into_graph_inputs(self) -> (EntityProperties, Vec<RelationTriple>) {
        let mut entities = EntityProperties::new();
        for entity in self.entities {
            let mut props = serde_json::Map::new();
            props.insert(
                "category".to_string(),
                serde_json::Value::String(entity.category.to_string()),
            );
            if let Some(description) = entity.description {
                props.insert(
                    "description".to_string(),
                    serde_json::Value::String(description),
                );
            }
            entities.insert(entity.name, serde_json::Value::Object(props));
        }
        (entities, self.relations)
    }
}

/// Raw JSON structures for LLM response parsing.
/// These allow flexible parsing before converting to typed structs.
mod raw {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct RawEntity {
        pub name: Option<String>,
        #[serde(alias = "type", alias = "entityType", alias = "entity_type")]
        pub category: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RawRelation {
        #[serde(alias = "from")]
        pub source: Option<String>,
        #[serde(alias = "to")]
        pub target: Option<String>,
        #[serde(alias = "type", alias = "relationship", alias = "relation_type")]
        pub relation: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RawExtractionResult {
        #[serde(default)]
        pub entities: Vec<RawEntity>,
        #[serde(default, alias = "relationships")]
        pub relations: Vec<RawRelation>,
    }
}

/// LLM-based entity extractor.
pub struct LlmEntityExtractor {
    llm: Arc<dyn Llm>,
}

impl LlmEntityExtractor {
    /// Create a new entity extractor.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// Extract entities and relations from text.
    pub async fn extract(&self, text: &str) -> TrellisResult<ExtractionResult> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(ExtractionResult::default());
        }

        let messages = vec![
            PromptMessage::system(Self::system_prompt()),
            PromptMessage::user(format!(
                "Extract entities and relations from this text:\n\n{}",
                text
            )),
        ];

        let options = GenerationOptions {
            temperature: Some(0.0), // Deterministic for extraction
            response_format: Some(ResponseFormat::Json),
            ..Default::default()
        };

        let response = self.llm.generate(&messages, Some(options)).await?;
        let content = response.content.unwrap_or_default();
        self.parse_response(&content)
    }

    /// Generate the system prompt for extraction.
    fn system_prompt() -> String {
        let categories: Vec<String> = EntityCategory::all()
            .iter()
            .map(|c| c.to_string())
            .collect();

        format!(
            r#"You are an entity extraction system. Extract entities and relations from text.

ENTITY CATEGORIES: {}

Output JSON in this exact format:
{{
  "entities": [
    {{"name": "entity name", "category": "CATEGORY", "description": "brief description"}}
  ],
  "relations": [
    {{"source": "source entity", "target": "target entity", "relation": "relation label"}}
  ]
}}

Rules:
1. Only extract explicitly mentioned entities
2. Use the most specific category that applies
3. Keep descriptions brief (under 50 words)
4. If no entities found, return empty arrays
5. Entity names should be normalized (proper capitalization)

Return ONLY valid JSON, no other text."#,
            categories.join(", ")
        )
    }

    /// Parse the LLM response into an ExtractionResult.
    pub(crate) fn parse_response(&self, content: &str) -> TrellisResult<ExtractionResult> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(ExtractionResult::default());
        }

        let json_str = Self::extract_json(content);

        let raw_result: raw::RawExtractionResult = match serde_json::from_str(json_str) {
            Ok(result) => result,
            Err(e) => match Self::lenient_parse(json_str) {
                Some(result) => result,
                None => {
                    tracing::warn!("Failed to parse extraction response: {}", e);
                    return Ok(ExtractionResult::default());
                }
            },
        };

        let entities = raw_result
            .entities
            .into_iter()
            .filter_map(Self::convert_entity)
            .collect();
        let relations = raw_result
            .relations
            .into_iter()
            .filter_map(Self::convert_relation)
            .collect();

        Ok(ExtractionResult {
            entities,
            relations,
        })
    }

    /// Extract JSON from response (handles markdown code blocks).
    fn extract_json(content: &str) -> &str {
        static JSON_BLOCK: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").unwrap());

        if let Some(caps) = JSON_BLOCK.captures(content) {
            if let Some(m) = caps.get(1) {
                return m.as_str().trim();
            }
        }
        content
    }

    /// Lenient parsing for malformed JSON.
    fn lenient_parse(json_str: &str) -> Option<raw::RawExtractionResult> {
        let fixed = json_str
            .replace('\'', "\"")
            .replace(",]", "]")
            .replace(",}", "}");
        serde_json::from_str(&fixed).ok()
    }

    /// Convert a raw entity to a typed entity.
    fn convert_entity(raw: raw::RawEntity) -> Option<ExtractedEntity> {
        let name = raw.name?.trim().to_string();
        if name.is_empty() {
            return None;
        }

        let category = raw
            .category
            .as_deref()
            .and_then(EntityCategory::from_str_flexible)
            .unwrap_or(EntityCategory::Concept);

        let mut entity = ExtractedEntity::new(name, category);
        if let Some(description) = raw.description {
            let description = description.trim();
            if !description.is_empty() {
                entity = entity.with_description(description);
            }
        }
        Some(entity)
    }

    /// Convert a raw relation to a triple.
    fn convert_relation(raw: raw::RawRelation) -> Option<RelationTriple> {
        let source = raw.source?.trim().to_string();
        let target = raw.target?.trim().to_string();
        if source.is_empty() || target.is_empty() {
            return None;
        }

        let relation = raw
            .relation
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_RELATION.to_string());

        Some(RelationTriple::new(source, target, relation))
    }
}
