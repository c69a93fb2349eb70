//! Query resolution over a caller-supplied note set.
//!
//! One evaluation walks the tiers in order and stops at the first that
//! produces a result:
//!
//! 1. Empty query or empty note set: the notes come back unchanged.
//! 2. Cache hit on the query key.
//! 3. Date filter, when the query contains a date reference.
//! 4. Semantic ranking, when the generation service answers its probe and
//!    every embedding request succeeds.
//! 5. Conjunctive keyword filter.
//!
//! Generation failures never escape; they route to the keyword tier.

use std::sync::Arc;
use std::time::Instant;

use futures::{stream, StreamExt, TryStreamExt};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use jotter_core::{
    CachedValue, FallbackReason, GenerationBackend, GenerationError, GenerationRequest, Note,
    ResultCache, SearchConfig,
};

use crate::{date_parser, keyword, similarity};

/// Which tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTier {
    /// Empty query or note set; input returned unchanged.
    Passthrough,
    Cache,
    Date,
    Semantic,
    Keyword,
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Passthrough => "passthrough",
            Self::Cache => "cache",
            Self::Date => "date",
            Self::Semantic => "semantic",
            Self::Keyword => "keyword",
        };
        f.write_str(name)
    }
}

/// Ordered result of one query plus the tier that produced it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub notes: Vec<Note>,
    pub tier: ResolutionTier,
    /// Why the semantic tier was skipped, when the keyword tier answered.
    pub fallback_reason: Option<FallbackReason>,
}

/// Cache key for a query over a specific note set.
///
/// Encodes the query text, the note count and a SHA-256 fingerprint of every
/// note's id and `updated_at` in order, so an edited note set never reuses a
/// stale entry.
pub fn query_cache_key(query: &str, notes: &[Note]) -> String {
    let mut hasher = Sha256::new();
    for note in notes {
        hasher.update(note.id.as_bytes());
        hasher.update(note.updated_at.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    }
    format!(
        "query-{}-{}-{}",
        query,
        notes.len(),
        hex::encode(hasher.finalize())
    )
}

/// Resolves free-text queries to ordered note lists.
pub struct QueryResolver {
    backend: Arc<dyn GenerationBackend>,
    cache: Arc<ResultCache>,
    config: SearchConfig,
}

impl QueryResolver {
    pub fn new(backend: Arc<dyn GenerationBackend>, cache: Arc<ResultCache>) -> Self {
        Self {
            backend,
            cache,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Resolve `query` against `notes`, returning the ordered matches.
    pub async fn resolve(&self, query: &str, notes: &[Note]) -> Vec<Note> {
        self.resolve_detailed(query, notes).await.notes
    }

    /// Resolve `query` and report which tier answered.
    #[instrument(skip(self, notes), fields(
        subsystem = "search",
        component = "query_resolver",
        op = "resolve",
        candidate_count = notes.len(),
    ))]
    pub async fn resolve_detailed(&self, query: &str, notes: &[Note]) -> Resolution {
        let start = Instant::now();

        if query.trim().is_empty() || notes.is_empty() {
            debug!(tier = %ResolutionTier::Passthrough, "Nothing to filter");
            return Resolution {
                notes: notes.to_vec(),
                tier: ResolutionTier::Passthrough,
                fallback_reason: None,
            };
        }

        let key = query_cache_key(query, notes);
        if let Some(cached) = self.cache.get_notes(&key) {
            debug!(cache_hit = true, result_count = cached.len(), "Query cache hit");
            return Resolution {
                notes: cached,
                tier: ResolutionTier::Cache,
                fallback_reason: None,
            };
        }
        debug!(cache_hit = false, "Query cache miss");

        let date_reference = date_parser::parse(query);
        let (results, tier, fallback_reason) = if let Some(reference) = date_reference {
            debug!(matched = %reference.matched, at = %reference.at, "Date reference found");
            let filtered: Vec<Note> = notes
                .iter()
                .filter(|note| note.created_at >= reference.at)
                .cloned()
                .collect();
            (filtered, ResolutionTier::Date, None)
        } else {
            let ranked = if self.backend.probe().await {
                self.semantic_rank(query, notes).await
            } else {
                Err(FallbackReason::ServiceUnavailable)
            };
            match ranked {
                Ok(ranked) => (ranked, ResolutionTier::Semantic, None),
                Err(reason) => {
                    warn!(
                        tier = %ResolutionTier::Keyword,
                        reason = %reason,
                        "Semantic search unavailable, using keyword search"
                    );
                    (
                        keyword::keyword_filter(query, notes),
                        ResolutionTier::Keyword,
                        Some(reason),
                    )
                }
            }
        };

        self.cache.put(key, CachedValue::Notes(results.clone()));

        debug!(
            %tier,
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Query resolved"
        );

        Resolution {
            notes: results,
            tier,
            fallback_reason,
        }
    }

    /// Rank every note by similarity to the query embedding.
    ///
    /// Note embeddings are requested through a bounded pipeline; the first
    /// failure aborts the whole ranking.
    async fn semantic_rank(&self, query: &str, notes: &[Note]) -> Result<Vec<Note>, FallbackReason> {
        let start = Instant::now();
        let query_vector = self
            .embed(query.to_string())
            .await
            .map_err(|e| embedding_failed(&e))?;

        let note_vectors: Vec<Vec<f32>> = stream::iter(notes)
            .map(|note| self.embed(note.embedding_text()))
            .buffered(self.config.embed_concurrency.max(1))
            .try_collect()
            .await
            .map_err(|e| embedding_failed(&e))?;

        let candidates: Vec<(&Note, Vec<f32>)> = notes.iter().zip(note_vectors).collect();
        let ranked = similarity::rank(&query_vector, &candidates).map_err(|e| {
            debug!(error = %e, "Ranking aborted");
            e.reason()
        })?;

        debug!(
            embedded = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Semantic ranking complete"
        );
        Ok(ranked.into_iter().cloned().collect())
    }

    async fn embed(&self, text: String) -> Result<Vec<f32>, GenerationError> {
        self.backend
            .generate(&GenerationRequest::embedding(text))
            .await?
            .into_embedding()
    }
}

fn embedding_failed(err: &GenerationError) -> FallbackReason {
    debug!(error = %err, "Embedding request failed");
    err.reason()
}
