//! Ollama backend implementation
//!
//! HTTP client for the Ollama generate API. The endpoint and model are
//! constructor parameters, not process-wide state, so tests can point a
//! backend anywhere.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

use super::TextGenerator;

const GENERATE_TIMEOUT: Duration = Duration::from_secs(25);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Ollama text-generation backend
#[derive(Clone)]
pub struct OllamaGenerator {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
        }
    }

    async fn try_generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };
        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(GENERATE_TIMEOUT)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let payload: GenerateResponse = response.json().await?;
        Ok(payload.response.trim().to_string())
    }
}

/// Request to Ollama generate API
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Response from Ollama tags API
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    #[serde(default)]
    name: String,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => {
                debug!(model = %self.model, chars = text.len(), "ollama generated reply");
                text
            }
            Err(e) => {
                warn!(model = %self.model, host = %self.base_url, error = %e,
                      "ollama generation failed, falling back to canned text");
                String::new()
            }
        }
    }

    async fn health_check(&self) -> (bool, Vec<String>) {
        let result = self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                debug!(host = %self.base_url, error = %e, "ollama offline");
                return (false, Vec::new());
            }
        };

        match response.json::<TagsResponse>().await {
            Ok(tags) => {
                let models = tags
                    .models
                    .into_iter()
                    .map(|m| m.name)
                    .filter(|n| !n.is_empty())
                    .collect();
                (true, models)
            }
            Err(_) => (false, Vec::new()),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
