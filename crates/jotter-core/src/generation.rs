//! Request and response shapes for the generation service.
//!
//! A [`GenerationRequest`] is built per call and never persisted.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::GenerationError;

/// Which model a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Text generation; the service answers with a string.
    Generation,
    /// Embedding; the service answers with a numeric vector.
    Embedding,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generation => write!(f, "generation"),
            Self::Embedding => write!(f, "embedding"),
        }
    }
}

/// Optional sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: Some(defaults::GEN_TEMPERATURE),
            max_tokens: Some(defaults::GEN_MAX_TOKENS),
        }
    }
}

/// A single prompt sent to the generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: ModelKind,
    pub options: Option<GenerationOptions>,
}

impl GenerationRequest {
    /// Text generation with the default sampling options.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: ModelKind::Generation,
            options: Some(GenerationOptions::default()),
        }
    }

    /// Embedding request; embeddings carry no sampling options.
    pub fn embedding(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: ModelKind::Embedding,
            options: None,
        }
    }

    /// Override the sampling options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Parsed output of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Text(String),
    Embedding(Vec<f32>),
}

impl GenerationOutput {
    /// Unwrap a text answer, rejecting a vector as malformed.
    pub fn into_text(self) -> Result<String, GenerationError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Embedding(_) => Err(GenerationError::MalformedResponse(
                "expected text, got a vector".to_string(),
            )),
        }
    }

    /// Unwrap an embedding answer, rejecting text as malformed.
    pub fn into_embedding(self) -> Result<Vec<f32>, GenerationError> {
        match self {
            Self::Embedding(vector) => Ok(vector),
            Self::Text(_) => Err(GenerationError::MalformedResponse(
                "expected a vector, got text".to_string(),
            )),
        }
    }
}
