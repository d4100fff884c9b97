//! Mock generator for testing
//!
//! Deterministic stand-in for the Ollama backend: tests configure the reply
//! (or lack of one) and whether the backend reports as healthy.

use async_trait::async_trait;

use super::TextGenerator;

/// Mock text-generation backend
#[derive(Clone, Default)]
pub struct MockGenerator {
    /// Whether health_check reports online
    pub healthy: bool,
    /// Canned reply; `None` simulates a generation failure (empty string)
    pub reply: Option<String>,
}

impl MockGenerator {
    /// Healthy mock with no canned reply
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: None,
        }
    }

    /// Healthy mock that always answers with `reply`
    pub fn with_reply(reply: &str) -> Self {
        Self {
            healthy: true,
            reply: Some(reply.to_string()),
        }
    }

    /// Offline mock
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            reply: None,
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> String {
        self.reply.clone().unwrap_or_default()
    }

    async fn health_check(&self) -> (bool, Vec<String>) {
        if self.healthy {
            (true, vec!["mock".to_string()])
        } else {
            (false, Vec::new())
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
