//! trellis-llm - LLM provider implementations for trellis.
//!
//! # Supported Providers
//!
//! - **OpenAI** - GPT-4o, GPT-4o-mini, etc.
//! - **Anthropic** - Claude 3.5, Claude 3, etc.
//!
//! # Example
//!
//! ```ignore
//! use trellis_llm::LlmFactory;
//!
//! let llm = LlmFactory::openai_with_model("gpt-4o-mini")?;
//! let llm = LlmFactory::anthropic_with_model("claude-3-5-haiku-20241022")?;
//! ```

mod anthropic;
mod factory;
mod openai;

pub use anthropic::AnthropicLlm;
pub use factory::LlmFactory;
pub use openai::OpenAiLlm;

// Re-export core types for convenience
pub use trellis_core::config::LlmProvider;
pub use trellis_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, ResponseFormat};
