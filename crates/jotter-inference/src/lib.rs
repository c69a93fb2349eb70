//! # jotter-inference
//!
//! Generation backend implementations for jotter.
//!
//! This crate provides:
//! - Ollama backend for text generation and embeddings over `/api/generate`
//! - A mock backend with call logging for deterministic tests
//!
//! Every failure leaves the backend as a typed [`GenerationError`]; callers
//! decide whether to fall back.

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use jotter_core::*;

#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;
