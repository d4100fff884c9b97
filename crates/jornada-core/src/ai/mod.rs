//! Pluggable text-generation backend
//!
//! The assistant consults a generative backend only when no deterministic
//! component can answer, and treats every backend failure as "no text
//! produced" - the dependency is soft and recoverable by design.
//!
//! - `TextGenerator` trait: the interface every backend implements
//! - `GeneratorClient` enum: concrete wrapper providing Clone + compile-time
//!   dispatch
//! - Backends: `OllamaGenerator`, `MockGenerator`

mod mock;
mod ollama;

pub use mock::MockGenerator;
pub use ollama::OllamaGenerator;

use async_trait::async_trait;

/// Trait for generative-text backends.
///
/// `generate` never fails from the caller's point of view: any transport or
/// payload problem collapses to an empty string, which callers must treat as
/// "no response" and replace with deterministic text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt. Empty string on any failure.
    async fn generate(&self, prompt: &str) -> String;

    /// Whether the backend is reachable, and which models it offers.
    async fn health_check(&self) -> (bool, Vec<String>);

    /// Model name (for logging)
    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete generator client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum GeneratorClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaGenerator),
    /// Mock backend for testing
    Mock(MockGenerator),
}

impl GeneratorClient {
    /// Create a client from environment variables.
    ///
    /// Requires `OLLAMA_HOST`; `OLLAMA_MODEL` defaults to `gpt-oss`.
    /// Returns None when no host is configured.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "gpt-oss".to_string());
        Some(Self::ollama(&host, &model))
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        GeneratorClient::Ollama(OllamaGenerator::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        GeneratorClient::Mock(MockGenerator::new())
    }

    /// Create a new instance with a different model (same host).
    ///
    /// Used for runtime model override (e.g., `--model` on the CLI).
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            GeneratorClient::Ollama(b) => GeneratorClient::Ollama(b.with_model(model)),
            GeneratorClient::Mock(b) => GeneratorClient::Mock(b.with_model(model)),
        }
    }
}

#[async_trait]
impl TextGenerator for GeneratorClient {
    async fn generate(&self, prompt: &str) -> String {
        match self {
            GeneratorClient::Ollama(b) => b.generate(prompt).await,
            GeneratorClient::Mock(b) => b.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> (bool, Vec<String>) {
        match self {
            GeneratorClient::Ollama(b) => b.health_check().await,
            GeneratorClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            GeneratorClient::Ollama(b) => b.model(),
            GeneratorClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            GeneratorClient::Ollama(b) => b.host(),
            GeneratorClient::Mock(b) => b.host(),
        }
    }
}
