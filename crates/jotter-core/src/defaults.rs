//! Centralized default constants for jotter.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Runtime overrides go through [`crate::config::EngineConfig`].

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default generation model name (Ollama).
pub const GEN_MODEL: &str = "llama2";

/// Default embedding model name (Ollama).
pub const EMBED_MODEL: &str = "nomic-embed-text";

/// Timeout for every outbound request in seconds.
///
/// The liveness probe uses the same value as real calls.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Prompt sent by the liveness probe.
pub const PROBE_PROMPT: &str = "test";

/// Sampling temperature for text generation.
pub const GEN_TEMPERATURE: f32 = 0.3;

/// Maximum output length for text generation (tokens).
pub const GEN_MAX_TOKENS: u32 = 150;

/// Generation calls slower than this are logged as slow.
pub const SLOW_GENERATION_MS: u64 = 5_000;

// =============================================================================
// RESULT CACHE
// =============================================================================

/// Maximum number of live cache entries.
pub const CACHE_CAPACITY: usize = 500;

/// Time-to-live for every cache entry in seconds (24 hours).
pub const CACHE_TTL_SECS: u64 = 24 * 60 * 60;

// =============================================================================
// SEARCH
// =============================================================================

/// Ceiling on concurrent per-note embedding requests.
pub const EMBED_CONCURRENCY: usize = 8;

// =============================================================================
// ENRICHMENT
// =============================================================================

/// Word cap of the local summary fallback for `short` summaries.
pub const SUMMARY_WORDS_SHORT: usize = 10;

/// Word cap of the local summary fallback for `medium` summaries.
pub const SUMMARY_WORDS_MEDIUM: usize = 20;

/// Word cap of the local summary fallback for `long` summaries.
pub const SUMMARY_WORDS_LONG: usize = 30;

/// Number of sentences kept by the local key-point fallback.
pub const KEY_POINT_SENTENCES: usize = 3;
