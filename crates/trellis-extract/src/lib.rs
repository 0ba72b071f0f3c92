//! trellis-extract - Document extraction primitives for trellis.
//!
//! Text splitting plus the deterministic extraction collaborators the
//! document pipeline injects: a keyword-table NER and a co-occurrence
//! relation extractor. Callers with a real model swap these out behind
//! the `Ner` / `RelationExtractor` traits from trellis-core.

mod ner;
mod relations;
mod splitter;

pub use ner::{KeywordNer, KeywordRule};
pub use relations::{CooccurrenceExtractor, CooccurrenceRule};
pub use splitter::RecursiveSplitter;

// Re-export the trait seams for convenience
pub use trellis_core::traits::{CategorizedEntities, Ner, RelationExtractor};
