//! Co-occurrence relation extraction.
//!
//! Emits a fixed relation triple whenever both endpoints of a rule
//! appear in the same chunk. A stand-in for a learned relation
//! extractor; one triple per matching chunk, no dedup across chunks.

use async_trait::async_trait;

use trellis_core::error::TrellisResult;
use trellis_core::traits::RelationExtractor;
use trellis_core::types::RelationTriple;

/// One co-occurrence rule: two trigger strings and the triple to emit.
#[derive(Debug, Clone)]
pub struct CooccurrenceRule {
    /// First trigger substring.
    pub left: String,
    /// Second trigger substring.
    pub right: String,
    /// Triple emitted when both triggers share a chunk.
    pub triple: RelationTriple,
}

impl CooccurrenceRule {
    /// Create a rule whose triple links the trigger strings themselves.
    pub fn linking(
        left: impl Into<String>,
        right: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        let left = left.into();
        let right = right.into();
        let triple = RelationTriple::new(left.clone(), right.clone(), relation);
        Self {
            left,
            right,
            triple,
        }
    }
}

/// Co-occurrence relation extractor.
pub struct CooccurrenceExtractor {
    rules: Vec<CooccurrenceRule>,
}

impl CooccurrenceExtractor {
    /// Create an extractor with an explicit rule table.
    pub fn new(rules: Vec<CooccurrenceRule>) -> Self {
        Self { rules }
    }

    /// The default rule table the document pipeline ships with.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            CooccurrenceRule::linking("Apple Inc.", "iPhone", "manufactures"),
            CooccurrenceRule::linking("Apple Inc.", "Cupertino", "headquartered_in"),
        ])
    }
}

impl Default for CooccurrenceExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl RelationExtractor for CooccurrenceExtractor {
    async fn extract(&self, chunks: &[String]) -> TrellisResult<Vec<RelationTriple>> {
        let mut relations = Vec::new();
        for chunk in chunks {
            for rule in &self.rules {
                if chunk.contains(rule.left.as_str()) && chunk.contains(rule.right.as_str()) {
                    relations.push(rule.triple.clone());
                }
            }
        }
        Ok(relations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cooccurrence_in_same_chunk() {
        let extractor = CooccurrenceExtractor::with_defaults();
        let chunks = vec!["Apple Inc. manufactures the iPhone in volume.".to_string()];
        let relations = extractor.extract(&chunks).await.unwrap();
        assert!(relations.contains(&RelationTriple::new(
            "Apple Inc.",
            "iPhone",
            "manufactures"
        )));
    }

    #[tokio::test]
    async fn test_split_across_chunks_yields_nothing() {
        let extractor = CooccurrenceExtractor::with_defaults();
        let chunks = vec![
            "Apple Inc. is a company.".to_string(),
            "The iPhone is a product.".to_string(),
        ];
        let relations = extractor.extract(&chunks).await.unwrap();
        assert!(relations.is_empty());
    }

    #[tokio::test]
    async fn test_both_rules_fire() {
        let extractor = CooccurrenceExtractor::with_defaults();
        let chunks =
            vec!["Apple Inc. of Cupertino manufactures the iPhone.".to_string()];
        let relations = extractor.extract(&chunks).await.unwrap();
        assert_eq!(relations.len(), 2);
        assert!(relations.contains(&RelationTriple::new(
            "Apple Inc.",
            "Cupertino",
            "headquartered_in"
        )));
    }

    #[tokio::test]
    async fn test_repeated_chunks_repeat_triples() {
        let extractor = CooccurrenceExtractor::with_defaults();
        let chunk = "Apple Inc. makes the iPhone.".to_string();
        let relations = extractor
            .extract(&[chunk.clone(), chunk])
            .await
            .unwrap();
        assert_eq!(relations.len(), 2);
    }
}
