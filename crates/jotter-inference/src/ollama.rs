//! Ollama generation backend.
//!
//! Both text generation and embeddings go through the `/api/generate`
//! endpoint with `stream: false`. Text answers arrive as
//! `{"response": "..."}` and embeddings as `{"response": [0.1, ...]}`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use jotter_core::{
    defaults, Error, GenerationBackend, GenerationError, GenerationOptions, GenerationOutput,
    GenerationRequest, ModelKind, OllamaConfig, Result,
};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = defaults::OLLAMA_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Default embedding model.
pub const DEFAULT_EMBED_MODEL: &str = defaults::EMBED_MODEL;

/// Timeout shared by the probe and real requests (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = defaults::REQUEST_TIMEOUT_SECS;

/// Ollama inference backend.
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    gen_model: String,
    embed_model: String,
    timeout: Duration,
}

impl OllamaBackend {
    /// Create a new Ollama backend with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a new Ollama backend with custom configuration.
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing Ollama backend: url={}, gen={}, embed={}, timeout={}s",
            config.base_url, config.gen_model, config.embed_model, config.timeout_secs
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            gen_model: config.gen_model,
            embed_model: config.embed_model,
            timeout,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_config(jotter_core::EngineConfig::from_env().ollama)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    async fn post(&self, body: &GenerateRequest<'_>) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
    }
}

/// Request payload for `/api/generate`.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
}

/// Response from `/api/generate`; `response` is a string or a vector.
#[derive(Deserialize)]
struct GenerateResponse {
    response: serde_json::Value,
}

fn unavailable(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::ServiceUnavailable(format!("Request timed out: {}", e))
    } else {
        GenerationError::ServiceUnavailable(format!("Request failed: {}", e))
    }
}

/// Interpret the `response` field according to the requested model kind.
fn parse_output(
    kind: ModelKind,
    response: serde_json::Value,
) -> std::result::Result<GenerationOutput, GenerationError> {
    match kind {
        ModelKind::Generation => match response {
            serde_json::Value::String(text) => Ok(GenerationOutput::Text(text.trim().to_string())),
            other => Err(GenerationError::MalformedResponse(format!(
                "expected a string response, got {}",
                json_kind(&other)
            ))),
        },
        ModelKind::Embedding => {
            let vector: Vec<f32> = serde_json::from_value(response).map_err(|e| {
                GenerationError::MalformedResponse(format!("expected a numeric vector: {}", e))
            })?;
            if vector.is_empty() {
                return Err(GenerationError::MalformedResponse(
                    "embedding vector is empty".to_string(),
                ));
            }
            Ok(GenerationOutput::Embedding(vector))
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    #[instrument(skip(self), fields(subsystem = "inference", component = "ollama", op = "probe", model = %self.gen_model))]
    async fn probe(&self) -> bool {
        let body = GenerateRequest {
            model: &self.gen_model,
            prompt: defaults::PROBE_PROMPT,
            stream: false,
            options: None,
        };

        match self.post(&body).await {
            Ok(resp) if resp.status().is_success() => {
                debug!("Ollama probe passed");
                true
            }
            Ok(resp) => {
                warn!("Ollama probe failed: {}", resp.status());
                false
            }
            Err(e) => {
                warn!("Ollama probe error: {}", e);
                false
            }
        }
    }

    #[instrument(skip(self, request), fields(subsystem = "inference", component = "ollama", op = "generate", kind = %request.model, model = %self.model_name(request.model), prompt_len = request.prompt.len()))]
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationOutput, GenerationError> {
        let start = Instant::now();
        let body = GenerateRequest {
            model: self.model_name(request.model),
            prompt: &request.prompt,
            stream: false,
            options: request.options,
        };

        let response = self.post(&body).await.map_err(unavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ServiceUnavailable(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await.map_err(unavailable)?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes).map_err(|e| {
            GenerationError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;
        let output = parse_output(request.model, parsed.response)?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(duration_ms = elapsed, "Generation complete");
        if elapsed > defaults::SLOW_GENERATION_MS {
            warn!(
                duration_ms = elapsed,
                prompt_len = request.prompt.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(output)
    }

    fn model_name(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::Generation => &self.gen_model,
            ModelKind::Embedding => &self.embed_model,
        }
    }
}
