//! # jotter-search
//!
//! Query resolution for jotter.
//!
//! This crate provides:
//! - Date-reference extraction from free text
//! - Cosine-similarity ranking of note embeddings
//! - Conjunctive keyword filtering
//! - The tiered [`QueryResolver`] (date, then semantic, then keyword)
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use jotter_inference::OllamaBackend;
//! use jotter_search::{QueryResolver, ResultCache};
//!
//! let backend = Arc::new(OllamaBackend::from_env()?);
//! let resolver = QueryResolver::new(backend, Arc::new(ResultCache::with_defaults()));
//!
//! let recent = resolver.resolve("notes from last week", &notes).await;
//! let related = resolver.resolve("meeting project", &notes).await;
//! ```

pub mod date_parser;
pub mod keyword;
pub mod resolver;
pub mod similarity;

// Re-export core types
pub use jotter_core::*;

pub use keyword::keyword_filter;
pub use resolver::{query_cache_key, QueryResolver, Resolution, ResolutionTier};
pub use similarity::{cosine_similarity, rank, score_candidates};
