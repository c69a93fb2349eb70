//! Mock generation backend for deterministic testing.
//!
//! Generates deterministic embeddings and canned text responses, and records
//! every probe and request so tests can assert how often the service was
//! touched.
//!
//! ## Usage
//!
//! ```rust
//! use jotter_inference::mock::MockGenerationBackend;
//! use jotter_core::{GenerationBackend, GenerationRequest};
//!
//! # tokio_test_block(async {
//! let backend = MockGenerationBackend::new()
//!     .with_dimension(8)
//!     .with_fixed_response("Test response");
//!
//! let text = backend
//!     .generate(&GenerationRequest::text("anything"))
//!     .await
//!     .unwrap()
//!     .into_text()
//!     .unwrap();
//! assert_eq!(text, "Test response");
//! assert_eq!(backend.generate_call_count(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use jotter_core::{
    GenerationBackend, GenerationError, GenerationOutput, GenerationRequest, ModelKind,
};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    available: bool,
    dimension: usize,
    response_mappings: Vec<(String, String)>,
    embeddings: HashMap<String, Vec<f32>>,
    failing_prompts: HashSet<String>,
    default_response: String,
    malformed: bool,
    latency_ms: u64,
    failure_rate: f64,
}

/// Kind of call recorded by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    Probe,
    Generate,
    Embed,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: MockOperation,
    pub input: String,
    pub timestamp: std::time::Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            available: true,
            dimension: 384,
            response_mappings: Vec::new(),
            embeddings: HashMap::new(),
            failing_prompts: HashSet::new(),
            default_response: "Mock response".to_string(),
            malformed: false,
            latency_ms: 0,
            failure_rate: 0.0,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new, reachable mock backend.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend whose probe fails and whose requests are refused.
    pub fn unavailable() -> Self {
        Self::new().with_available(false)
    }

    pub fn with_available(mut self, available: bool) -> Self {
        Arc::make_mut(&mut self.config).available = available;
        self
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        Arc::make_mut(&mut self.config).dimension = dimension;
        self
    }

    /// Set the text returned when no mapping matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Return `output` for any prompt containing `needle`.
    ///
    /// Mappings are checked in insertion order.
    pub fn with_response_mapping(
        mut self,
        needle: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .response_mappings
            .push((needle.into(), output.into()));
        self
    }

    /// Return a fixed vector when embedding exactly `text`.
    pub fn with_embedding(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        Arc::make_mut(&mut self.config)
            .embeddings
            .insert(text.into(), vector);
        self
    }

    /// Fail any request whose prompt is exactly `prompt`.
    pub fn with_failing_prompt(mut self, prompt: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config)
            .failing_prompts
            .insert(prompt.into());
        self
    }

    /// Answer every request with the wrong shape.
    pub fn with_malformed_responses(mut self) -> Self {
        Arc::make_mut(&mut self.config).malformed = true;
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Set failure rate (0.0 - 1.0) for testing error handling.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        Arc::make_mut(&mut self.config).failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    fn count(&self, operation: MockOperation) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn probe_call_count(&self) -> usize {
        self.count(MockOperation::Probe)
    }

    pub fn generate_call_count(&self) -> usize {
        self.count(MockOperation::Generate)
    }

    pub fn embed_call_count(&self) -> usize {
        self.count(MockOperation::Embed)
    }

    /// Probes plus requests of any kind.
    pub fn total_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn log_call(&self, operation: MockOperation, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation,
            input: input.to_string(),
            timestamp: std::time::Instant::now(),
        });
    }

    fn should_fail(&self) -> bool {
        use rand::Rng;
        if self.config.failure_rate > 0.0 {
            rand::thread_rng().gen::<f64>() < self.config.failure_rate
        } else {
            false
        }
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    fn text_for(&self, prompt: &str) -> String {
        self.config
            .response_mappings
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| self.config.default_response.clone())
    }

    fn embedding_for(&self, text: &str) -> Vec<f32> {
        self.config
            .embeddings
            .get(text)
            .cloned()
            .unwrap_or_else(|| MockEmbeddingGenerator::generate(text, self.config.dimension))
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn probe(&self) -> bool {
        self.log_call(MockOperation::Probe, "");
        self.simulate_latency().await;
        self.config.available
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        let operation = match request.model {
            ModelKind::Generation => MockOperation::Generate,
            ModelKind::Embedding => MockOperation::Embed,
        };
        self.log_call(operation, &request.prompt);
        self.simulate_latency().await;

        if !self.config.available {
            return Err(GenerationError::ServiceUnavailable(
                "connection refused".to_string(),
            ));
        }
        if self.config.failing_prompts.contains(&request.prompt) || self.should_fail() {
            return Err(GenerationError::ServiceUnavailable(
                "Simulated failure for testing".to_string(),
            ));
        }

        let output = match (request.model, self.config.malformed) {
            (ModelKind::Generation, false) => GenerationOutput::Text(self.text_for(&request.prompt)),
            (ModelKind::Embedding, false) => {
                GenerationOutput::Embedding(self.embedding_for(&request.prompt))
            }
            (ModelKind::Generation, true) => GenerationOutput::Embedding(vec![0.0]),
            (ModelKind::Embedding, true) => GenerationOutput::Text("not a vector".to_string()),
        };

        // Shape-check the way a real backend would.
        match request.model {
            ModelKind::Generation => output.into_text().map(GenerationOutput::Text),
            ModelKind::Embedding => output.into_embedding().map(GenerationOutput::Embedding),
        }
    }

    fn model_name(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::Generation => "mock-gen",
            ModelKind::Embedding => "mock-embed",
        }
    }
}

/// Mock embedding generator with deterministic output.
pub struct MockEmbeddingGenerator;

impl MockEmbeddingGenerator {
    /// Generate a deterministic embedding from text.
    ///
    /// Uses character-based hashing for reproducibility. The same text
    /// will always produce the same embedding.
    pub fn generate(text: &str, dimension: usize) -> Vec<f32> {
        let mut vec = vec![0.0; dimension.max(1)];
        let len = vec.len();

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % len;
            vec[idx] += 0.1;
        }

        Self::normalize(&mut vec);
        vec
    }

    fn normalize(vec: &mut [f32]) {
        let magnitude: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            vec.iter_mut().for_each(|x| *x /= magnitude);
        }
    }
}
