//! Extraction traits - the seams for NER and relation extraction.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::TrellisResult;
use crate::types::{EntityCategory, RelationTriple};

/// Entities extracted from a single chunk, grouped by category.
///
/// Categories with no surface strings are omitted from the map.
pub type CategorizedEntities = BTreeMap<EntityCategory, Vec<String>>;

/// Named-entity recognition over a text chunk.
#[async_trait]
pub trait Ner: Send + Sync {
    /// Extract entities from a chunk, grouped by category.
    async fn extract(&self, text: &str) -> TrellisResult<CategorizedEntities>;
}

/// Relation extraction over a chunked document.
#[async_trait]
pub trait RelationExtractor: Send + Sync {
    /// Scan chunks and emit relation triples.
    async fn extract(&self, chunks: &[String]) -> TrellisResult<Vec<RelationTriple>>;
}
