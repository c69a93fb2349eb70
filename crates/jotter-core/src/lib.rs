//! # jotter-core
//!
//! Core types, traits, and the shared result cache for jotter.
//!
//! This crate provides the data model (notes, categories, annotations), the
//! error taxonomy, the generation-backend and note-store traits, and the
//! bounded TTL cache that every derived computation reads and writes through.

pub mod cache;
pub mod config;
pub mod defaults;
pub mod error;
pub mod generation;
pub mod logging;
pub mod memory_store;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use cache::{CachedValue, ResultCache};
pub use config::{CacheConfig, EngineConfig, OllamaConfig, SearchConfig};
pub use error::{Error, FallbackReason, GenerationError, RankError, Result};
pub use generation::{GenerationOptions, GenerationOutput, GenerationRequest, ModelKind};
pub use memory_store::InMemoryNoteStore;
pub use models::*;
pub use traits::*;
