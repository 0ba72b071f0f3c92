//! Factory for creating LLM providers.

use std::sync::Arc;

use trellis_core::config::{LlmProvider, LlmProviderConfig};
use trellis_core::error::TrellisResult;
use trellis_core::traits::{Llm, LlmConfig};

use crate::anthropic::AnthropicLlm;
use crate::openai::OpenAiLlm;

/// Factory for creating LLM providers.
pub struct LlmFactory;

impl LlmFactory {
    /// Create an LLM provider from the given configuration.
    pub fn create(provider: LlmProvider, config: LlmConfig) -> TrellisResult<Arc<dyn Llm>> {
        match provider {
            LlmProvider::OpenAI => {
                let llm = OpenAiLlm::new(config)?;
                Ok(Arc::new(llm))
            }
            LlmProvider::Anthropic => {
                let llm = AnthropicLlm::new(config)?;
                Ok(Arc::new(llm))
            }
        }
    }

    /// Create an LLM provider from a combined provider config.
    pub fn from_config(config: &LlmProviderConfig) -> TrellisResult<Arc<dyn Llm>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an OpenAI LLM provider with a specific model.
    pub fn openai_with_model(model: impl Into<String>) -> TrellisResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::OpenAI, config)
    }

    /// Create an Anthropic LLM provider with a specific model.
    pub fn anthropic_with_model(model: impl Into<String>) -> TrellisResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::Anthropic, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_dispatches_on_provider() {
        let config = LlmConfig {
            model: "claude-3-5-haiku-20241022".to_string(),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let llm = LlmFactory::create(LlmProvider::Anthropic, config).unwrap();
        assert_eq!(llm.model_name(), "claude-3-5-haiku-20241022");
    }
}
