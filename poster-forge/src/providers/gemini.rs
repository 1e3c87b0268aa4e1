use async_trait::async_trait;
use poster_forge_core::contract::{ProviderError, TextGenerator};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{bare_model_name, malformed, response_json_or_error, transport_error};
use crate::load_config::{Secret, TextProviderConfig};

const PROVIDER: &str = "gemini";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Text generation for captions (`models/{model}:generateContent`).
pub struct GeminiTextClient {
    http: Client,
    endpoint: String,
    api_key: Secret,
}

impl GeminiTextClient {
    pub fn new(http: Client, config: &TextProviderConfig) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.api_base,
                bare_model_name(&config.model)
            ),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiTextClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        tracing::info!(endpoint = %self.endpoint, "Requesting captions from Gemini");
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.expose())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let parsed: GenerateContentResponse = response_json_or_error(PROVIDER, response).await?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .ok_or_else(|| malformed(PROVIDER, "no candidates returned"))?;
        tracing::debug!(raw = %text, "Raw Gemini output");
        Ok(text)
    }
}
