//! Runtime configuration for the query and enrichment engine.
//!
//! Configuration can be built in code (`Default` plus `with_*` setters) or
//! loaded from environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OLLAMA_BASE` | `http://localhost:11434` | Generation service URL |
//! | `OLLAMA_GEN_MODEL` | `llama2` | Text generation model |
//! | `OLLAMA_EMBED_MODEL` | `nomic-embed-text` | Embedding model |
//! | `JOTTER_TIMEOUT_SECS` | 10 | Timeout for probe and real calls |
//! | `JOTTER_CACHE_CAPACITY` | 500 | Maximum cache entries |
//! | `JOTTER_CACHE_TTL_SECS` | 86400 | Cache entry time-to-live |
//! | `JOTTER_EMBED_CONCURRENCY` | 8 | Concurrent per-note embedding calls |

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults;
use crate::error::{Error, Result};

/// Connection settings for the Ollama generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub gen_model: String,
    pub embed_model: String,
    /// Applies to the liveness probe and to real calls alike.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OLLAMA_URL.to_string(),
            gen_model: defaults::GEN_MODEL.to_string(),
            embed_model: defaults::EMBED_MODEL.to_string(),
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl OllamaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sizing of the shared result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: usize,
    /// Uniform for every entry; individual entries cannot override it.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::CACHE_CAPACITY,
            ttl_secs: defaults::CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Query resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum per-note embedding requests in flight at once.
    pub embed_concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            embed_concurrency: defaults::EMBED_CONCURRENCY,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub ollama: OllamaConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// Unparseable numeric values are ignored in favour of the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("OLLAMA_BASE") {
            config.ollama.base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_GEN_MODEL") {
            config.ollama.gen_model = model;
        }
        if let Some(model) = lookup("OLLAMA_EMBED_MODEL") {
            config.ollama.embed_model = model;
        }
        if let Some(secs) = lookup("JOTTER_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.ollama.timeout_secs = secs;
        }
        if let Some(cap) = lookup("JOTTER_CACHE_CAPACITY").and_then(|v| v.parse().ok()) {
            config.cache.capacity = cap;
        }
        if let Some(ttl) = lookup("JOTTER_CACHE_TTL_SECS").and_then(|v| v.parse().ok()) {
            config.cache.ttl_secs = ttl;
        }
        if let Some(n) = lookup("JOTTER_EMBED_CONCURRENCY").and_then(|v| v.parse().ok()) {
            config.search.embed_concurrency = n;
        }

        debug!(
            base_url = %config.ollama.base_url,
            gen_model = %config.ollama.gen_model,
            embed_model = %config.ollama.embed_model,
            timeout_secs = config.ollama.timeout_secs,
            cache_capacity = config.cache.capacity,
            "Loaded engine configuration"
        );
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.ollama.base_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.ollama.timeout_secs = secs;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache.capacity = capacity;
        self
    }

    pub fn with_cache_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.cache.ttl_secs = ttl_secs;
        self
    }

    pub fn with_embed_concurrency(mut self, n: usize) -> Self {
        self.search.embed_concurrency = n;
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.ollama.base_url.trim().is_empty() {
            return Err(Error::Config("generation service URL is empty".to_string()));
        }
        if self.ollama.timeout_secs == 0 {
            return Err(Error::Config("request timeout must be non-zero".to_string()));
        }
        if self.cache.capacity == 0 {
            return Err(Error::Config("cache capacity must be non-zero".to_string()));
        }
        if self.cache.ttl_secs == 0 {
            return Err(Error::Config("cache TTL must be non-zero".to_string()));
        }
        if self.search.embed_concurrency == 0 {
            return Err(Error::Config(
                "embedding concurrency must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
