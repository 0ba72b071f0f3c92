//! Keyword-table named-entity recognition.
//!
//! A deterministic stand-in for a real NER model: each keyword that
//! appears in a chunk contributes its surface strings under a fixed
//! category. Repeated occurrences across chunks are not deduplicated.

use async_trait::async_trait;

use trellis_core::error::TrellisResult;
use trellis_core::traits::{CategorizedEntities, Ner};
use trellis_core::types::EntityCategory;

/// One keyword rule: trigger string, category, emitted surface strings.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    /// Substring that triggers the rule.
    pub keyword: String,
    /// Category the surfaces are filed under.
    pub category: EntityCategory,
    /// Surface strings emitted when the keyword is present.
    pub surfaces: Vec<String>,
}

impl KeywordRule {
    /// Create a rule emitting the given surfaces.
    pub fn new(
        keyword: impl Into<String>,
        category: EntityCategory,
        surfaces: &[&str],
    ) -> Self {
        Self {
            keyword: keyword.into(),
            category,
            surfaces: surfaces.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Keyword-table NER implementation.
pub struct KeywordNer {
    rules: Vec<KeywordRule>,
}

impl KeywordNer {
    /// Create a NER with an explicit rule table.
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// The default rule table the document pipeline ships with.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            KeywordRule::new("Apple Inc.", EntityCategory::Org, &["Apple Inc."]),
            KeywordRule::new(
                "Cupertino",
                EntityCategory::Gpe,
                &["American", "Cupertino", "California"],
            ),
            KeywordRule::new(
                "iPhone",
                EntityCategory::Product,
                &["iPhone", "iPad", "Mac", "Apple Watch"],
            ),
        ])
    }
}

impl Default for KeywordNer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl Ner for KeywordNer {
    async fn extract(&self, text: &str) -> TrellisResult<CategorizedEntities> {
        let mut entities = CategorizedEntities::new();
        for rule in &self.rules {
            if text.contains(rule.keyword.as_str()) {
                entities
                    .entry(rule.category)
                    .or_default()
                    .extend(rule.surfaces.iter().cloned());
            }
        }
        // Categories without hits are never inserted, so the map only
        // carries non-empty entries.
        Ok(entities)
    }
}
