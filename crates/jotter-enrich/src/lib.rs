//! # jotter-enrich
//!
//! Derived annotations for note text: summaries, key points, sentiment and
//! category suggestions.
//!
//! Each operation is cached and degrades to a deterministic local fallback
//! when the generation service cannot answer. The fallbacks and output
//! normalisers are public so callers can use them directly.

pub mod fallback;
pub mod prompts;
pub mod service;

// Re-export core types
pub use jotter_core::*;

pub use fallback::{
    fallback_categories, fallback_key_points, fallback_sentiment, fallback_summary,
    filter_categories, normalize_key_points, parse_sentiment,
};
pub use service::EnrichmentService;
