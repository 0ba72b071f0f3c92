//! Error types for trellis operations.

use thiserror::Error;

/// Result type alias for trellis operations.
pub type TrellisResult<T> = Result<T, TrellisError>;

/// Main error type for all trellis operations.
#[derive(Error, Debug)]
pub enum TrellisError {
    /// Workflow wiring or execution failed.
    #[error("Workflow error: {message}")]
    Workflow { message: String },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// LLM operation failed.
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Knowledge-graph operation failed.
    #[error("Graph error: {message}")]
    Graph { message: String },

    /// Visualization rendering failed.
    #[error("Render error: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrellisError {
    /// Create a workflow error.
    pub fn workflow(message: impl Into<String>) -> Self {
        Self::Workflow {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an LLM error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            source: None,
        }
    }

    /// Create an LLM error with a source.
    pub fn llm_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Llm {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a graph error.
    pub fn graph(message: impl Into<String>) -> Self {
        Self::Graph {
            message: message.into(),
        }
    }

    /// Create a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
