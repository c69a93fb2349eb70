//! Structured logging field names for jotter.
//!
//! All crates use these constants so log aggregation can query by the same
//! field names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, backend construction) |
//! | DEBUG | Decision points: cache hit/miss, tier chosen |
//! | TRACE | Per-item iteration (similarity scores, evictions) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "inference", "search", "enrich", "cache", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "ollama", "query_resolver", "enrichment"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "probe", "generate", "resolve", "summarize"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Search query text.
pub const QUERY: &str = "query";

/// Fallback tier that produced a result ("date", "semantic", "keyword").
pub const TIER: &str = "tier";

/// Whether a result came from the cache.
pub const CACHE_HIT: &str = "cache_hit";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned.
pub const RESULT_COUNT: &str = "result_count";

/// Number of candidate notes supplied to a query.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Named failure reason from the generation path.
pub const REASON: &str = "reason";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
