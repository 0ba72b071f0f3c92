//! Configuration system for trellis.

use serde::{Deserialize, Serialize};

use crate::error::{TrellisError, TrellisResult};
use crate::traits::LlmConfig;

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Anthropic,
}

/// Provider configuration with type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Provider type.
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            config: LlmConfig {
                model: "gpt-4o-mini".to_string(),
                ..Default::default()
            },
        }
    }
}

/// Text splitter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Characters of carryover between adjacent chunks.
    pub chunk_overlap: usize,
    /// Fallback separators, coarsest first. The empty string means
    /// hard character windows.
    pub separators: Vec<String>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 50,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        }
    }
}

/// Main trellis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrellisConfig {
    /// Text splitter configuration.
    pub splitter: SplitterConfig,
    /// LLM configuration.
    pub llm: LlmProviderConfig,
}

impl TrellisConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> TrellisResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| TrellisError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| TrellisError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| TrellisError::Configuration(e.to_string())),
            _ => Err(TrellisError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(model) = std::env::var("TRELLIS_LLM_MODEL") {
            config.llm.config.model = model;
        }
        if let Ok(provider) = std::env::var("TRELLIS_LLM_PROVIDER") {
            match provider.to_lowercase().as_str() {
                "anthropic" => config.llm.provider = LlmProvider::Anthropic,
                "openai" => config.llm.provider = LlmProvider::OpenAI,
                _ => {}
            }
        }
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            if config.llm.provider == LlmProvider::OpenAI {
                config.llm.config.api_key = Some(api_key);
            }
        }
        if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
            if config.llm.provider == LlmProvider::Anthropic {
                config.llm.config.api_key = Some(api_key);
            }
        }
        if let Ok(size) = std::env::var("TRELLIS_CHUNK_SIZE") {
            if let Ok(size) = size.parse() {
                config.splitter.chunk_size = size;
            }
        }
        if let Ok(overlap) = std::env::var("TRELLIS_CHUNK_OVERLAP") {
            if let Ok(overlap) = overlap.parse() {
                config.splitter.chunk_overlap = overlap;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_splitter_config() {
        let config = SplitterConfig::default();
        assert_eq!(config.chunk_size, 300);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.separators, vec!["\n\n", "\n", " ", ""]);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[splitter]\nchunk_size = 128\n\n[llm]\nprovider = \"anthropic\"\nmodel = \"claude-3-5-haiku-20241022\""
        )
        .unwrap();

        let config = TrellisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.splitter.chunk_size, 128);
        assert_eq!(config.splitter.chunk_overlap, 50);
        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.llm.config.model, "claude-3-5-haiku-20241022");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = TrellisConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TrellisError::Configuration(_)));
    }
}
