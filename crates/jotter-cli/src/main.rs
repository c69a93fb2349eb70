//! jotter: query and enrich notes from the command line.
//!
//! Every command prints JSON to stdout; logs go to stderr. The generation
//! service being down never fails a command, only unreadable input does.
//!
//! Environment:
//!   OLLAMA_BASE, OLLAMA_GEN_MODEL, OLLAMA_EMBED_MODEL - generation service
//!   JOTTER_TIMEOUT_SECS, JOTTER_CACHE_CAPACITY, JOTTER_CACHE_TTL_SECS,
//!   JOTTER_EMBED_CONCURRENCY                          - engine tuning
//!   LOG_FORMAT - "json" or "text" (default: "text")
//!   RUST_LOG   - standard env filter (default: "jotter=info")

mod notes;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use jotter_core::{EngineConfig, GenerationBackend, ResultCache, SummaryLength};
use jotter_enrich::EnrichmentService;
use jotter_inference::OllamaBackend;
use jotter_search::QueryResolver;

#[derive(Parser)]
#[command(name = "jotter")]
#[command(author, version, about = "Natural-language note queries and enrichment")]
#[command(propagate_version = true)]
struct Cli {
    /// Generation service base URL (overrides OLLAMA_BASE)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides JOTTER_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a free-text query against a JSON note file
    Query {
        /// Query text, e.g. "notes from last week"
        text: String,

        /// JSON array of notes
        #[arg(short, long)]
        notes: PathBuf,

        /// Only consider notes owned by this user
        #[arg(long, default_value_t = Uuid::nil())]
        owner: Uuid,
    },

    /// Summarize text
    Summarize {
        text: String,

        /// short, medium or long
        #[arg(short, long, default_value_t = SummaryLength::Medium)]
        length: SummaryLength,
    },

    /// Extract key points from text
    KeyPoints { text: String },

    /// Classify text as positive, neutral or negative
    Sentiment { text: String },

    /// Suggest categories for text
    Categories { text: String },

    /// Run every enrichment on text
    Enrich {
        text: String,

        /// short, medium or long
        #[arg(short, long, default_value_t = SummaryLength::Medium)]
        length: SummaryLength,
    },

    /// Report whether the generation service is reachable
    Probe,
}

fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jotter=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Shared engine parts built from configuration.
struct Engine {
    backend: Arc<OllamaBackend>,
    cache: Arc<ResultCache>,
    config: EngineConfig,
}

impl Engine {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = EngineConfig::from_env();
        if let Some(url) = &cli.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = cli.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        config.validate()?;

        let backend = Arc::new(OllamaBackend::with_config(config.ollama.clone())?);
        let cache = Arc::new(ResultCache::new(config.cache));
        Ok(Self {
            backend,
            cache,
            config,
        })
    }

    fn resolver(&self) -> QueryResolver {
        QueryResolver::new(self.backend.clone(), self.cache.clone()).with_config(self.config.search)
    }

    fn enrichment(&self) -> EnrichmentService {
        EnrichmentService::new(self.backend.clone(), self.cache.clone())
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let engine = Engine::from_cli(&cli)?;

    match cli.command {
        Commands::Query { text, notes, owner } => {
            let candidates = notes::load_notes(&notes, owner).await?;
            debug!(candidate_count = candidates.len(), "Loaded notes");
            let resolution = engine.resolver().resolve_detailed(&text, &candidates).await;
            info!(
                tier = %resolution.tier,
                fallback_reason = ?resolution.fallback_reason,
                result_count = resolution.notes.len(),
                "Query resolved"
            );
            print_json(&serde_json::to_value(&resolution.notes)?)?;
        }
        Commands::Summarize { text, length } => {
            let summary = engine.enrichment().summarize(&text, length).await;
            print_json(&json!({ "summary": summary }))?;
        }
        Commands::KeyPoints { text } => {
            let key_points = engine.enrichment().extract_key_points(&text).await;
            print_json(&json!({ "key_points": key_points }))?;
        }
        Commands::Sentiment { text } => {
            let sentiment = engine.enrichment().analyze_sentiment(&text).await;
            print_json(&json!({ "sentiment": sentiment }))?;
        }
        Commands::Categories { text } => {
            let categories = engine.enrichment().suggest_categories(&text).await;
            print_json(&json!({ "categories": categories }))?;
        }
        Commands::Enrich { text, length } => {
            let annotations = engine.enrichment().enrich(&text, length).await;
            print_json(&serde_json::to_value(&annotations)?)?;
        }
        Commands::Probe => {
            let available = engine.backend.probe().await;
            print_json(&json!({
                "available": available,
                "base_url": engine.backend.base_url(),
            }))?;
        }
    }

    Ok(())
}
