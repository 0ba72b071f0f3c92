//! Backend traits - the injected seams for external collaborators.
//!
//! Every collaborator the pipelines delegate to (generation, NER,
//! relation extraction, graph updates) is reached through a trait object
//! passed in at construction, never through module-level state.

mod extract;
mod llm;
mod updater;

pub use extract::{CategorizedEntities, Ner, RelationExtractor};
pub use llm::{GenerationOptions, Llm, LlmConfig, LlmResponse, ResponseFormat, TokenUsage};
pub use updater::GraphUpdater;
