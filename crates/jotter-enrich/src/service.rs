//! Note enrichment service.
//!
//! Each operation reads the shared cache, then probes and generates with a
//! fixed prompt, then normalises and caches the answer. Any generation failure
//! is replaced by the matching local fallback, so every operation returns a
//! value.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use jotter_core::{
    CachedValue, Category, GenerationBackend, GenerationError, GenerationRequest,
    NoteAnnotations, ResultCache, Sentiment, SummaryLength,
};

use crate::fallback::{
    fallback_categories, fallback_key_points, fallback_sentiment, fallback_summary,
    filter_categories, normalize_key_points, parse_sentiment,
};
use crate::prompts;

// =============================================================================
// CACHE KEYS
// =============================================================================

pub fn summary_cache_key(text: &str, length: SummaryLength) -> String {
    format!("summary-{}-{}", text, length)
}

pub fn key_points_cache_key(text: &str) -> String {
    format!("keypoints-{}", text)
}

pub fn sentiment_cache_key(text: &str) -> String {
    format!("sentiment-{}", text)
}

pub fn categories_cache_key(text: &str) -> String {
    format!("categories-{}", text)
}

fn log_fallback(err: &GenerationError) {
    warn!(
        reason = %err.reason(),
        error = %err,
        "Generation failed, using local fallback"
    );
}

// =============================================================================
// SERVICE
// =============================================================================

/// Derives summaries, key points, sentiment and categories for note text.
pub struct EnrichmentService {
    backend: Arc<dyn GenerationBackend>,
    cache: Arc<ResultCache>,
}

impl EnrichmentService {
    pub fn new(backend: Arc<dyn GenerationBackend>, cache: Arc<ResultCache>) -> Self {
        Self { backend, cache }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Probe, then generate text for `prompt`.
    async fn generate_text(&self, prompt: String) -> Result<String, GenerationError> {
        self.backend
            .probe_and_generate(&GenerationRequest::text(prompt))
            .await?
            .into_text()
            .map(|text| text.trim().to_string())
    }

    /// Summarize `text` to roughly the sentence count of `length`.
    ///
    /// Empty input returns an empty summary without touching the cache or
    /// the generation service.
    #[instrument(skip(self, text), fields(
        subsystem = "enrich",
        component = "enrichment",
        op = "summarize",
        text_len = text.len(),
    ))]
    pub async fn summarize(&self, text: &str, length: SummaryLength) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let key = summary_cache_key(text, length);
        if let Some(cached) = self.cache.get_text(&key) {
            debug!(cache_hit = true, "Summary cache hit");
            return cached;
        }

        let summary = match self
            .generate_text(prompts::summary_prompt(text, length))
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                log_fallback(&e);
                fallback_summary(text, length)
            }
        };

        self.cache.put(key, CachedValue::Text(summary.clone()));
        summary
    }

    /// Extract key points as a list of bullet-free lines.
    #[instrument(skip(self, text), fields(
        subsystem = "enrich",
        component = "enrichment",
        op = "extract_key_points",
        text_len = text.len(),
    ))]
    pub async fn extract_key_points(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let key = key_points_cache_key(text);
        if let Some(cached) = self.cache.get_list(&key) {
            debug!(cache_hit = true, "Key points cache hit");
            return cached;
        }

        let raw = match self.generate_text(prompts::key_points_prompt(text)).await {
            Ok(raw) => raw,
            Err(e) => {
                log_fallback(&e);
                fallback_key_points(text)
            }
        };
        let points = normalize_key_points(&raw);

        self.cache.put(key, CachedValue::List(points.clone()));
        points
    }

    /// Classify `text` as positive, neutral or negative.
    ///
    /// A generated label outside those three is discarded in favour of the
    /// local word-count analysis.
    #[instrument(skip(self, text), fields(
        subsystem = "enrich",
        component = "enrichment",
        op = "analyze_sentiment",
        text_len = text.len(),
    ))]
    pub async fn analyze_sentiment(&self, text: &str) -> Sentiment {
        if text.trim().is_empty() {
            return Sentiment::Neutral;
        }

        let key = sentiment_cache_key(text);
        if let Some(cached) = self.cache.get_sentiment(&key) {
            debug!(cache_hit = true, "Sentiment cache hit");
            return cached;
        }

        let sentiment = match self.generate_text(prompts::sentiment_prompt(text)).await {
            Ok(label) => parse_sentiment(&label).unwrap_or_else(|| {
                warn!(label = %label, "Unrecognized sentiment label, using local fallback");
                fallback_sentiment(text)
            }),
            Err(e) => {
                log_fallback(&e);
                fallback_sentiment(text)
            }
        };

        self.cache.put(key, CachedValue::Sentiment(sentiment));
        sentiment
    }

    /// Suggest categories from the closed set for `text`.
    ///
    /// Generated labels outside the set are dropped. If none survive, the
    /// local keyword match is used instead.
    #[instrument(skip(self, text), fields(
        subsystem = "enrich",
        component = "enrichment",
        op = "suggest_categories",
        text_len = text.len(),
    ))]
    pub async fn suggest_categories(&self, text: &str) -> Vec<Category> {
        if text.trim().is_empty() {
            return vec![Category::Other];
        }

        let key = categories_cache_key(text);
        if let Some(cached) = self.cache.get_categories(&key) {
            debug!(cache_hit = true, "Categories cache hit");
            return cached;
        }

        let categories = match self.generate_text(prompts::categories_prompt(text)).await {
            Ok(raw) => {
                let filtered = filter_categories(&raw);
                if filtered.is_empty() {
                    warn!(raw = %raw, "No known categories in response, using local fallback");
                    fallback_categories(text)
                } else {
                    filtered
                }
            }
            Err(e) => {
                log_fallback(&e);
                fallback_categories(text)
            }
        };

        self.cache.put(key, CachedValue::Categories(categories.clone()));
        categories
    }

    /// Run all four derivations concurrently.
    pub async fn enrich(&self, text: &str, length: SummaryLength) -> NoteAnnotations {
        let (summary, key_points, sentiment, categories) = tokio::join!(
            self.summarize(text, length),
            self.extract_key_points(text),
            self.analyze_sentiment(text),
            self.suggest_categories(text),
        );
        NoteAnnotations {
            summary,
            key_points,
            sentiment,
            categories,
        }
    }
}
