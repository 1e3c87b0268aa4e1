use async_trait::async_trait;
use poster_forge_core::contract::{ImageGenerator, ProviderError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{decode_base64_image, malformed, response_json_or_error, transport_error};
use crate::load_config::{ImageProviderConfig, Secret};

const PROVIDER: &str = "openai";

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

/// Commercial image-generation API (`/images/generations`, base64 response format).
pub struct OpenAiImageClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Secret,
}

impl OpenAiImageClient {
    pub fn new(http: Client, config: &ImageProviderConfig) -> Self {
        Self {
            http,
            endpoint: format!("{}/images/generations", config.api_base),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        tracing::info!(endpoint = %self.endpoint, model = %self.model, "Requesting image from OpenAI");
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024",
            "quality": "standard",
            "response_format": "b64_json",
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let parsed: ImagesResponse = response_json_or_error(PROVIDER, response).await?;

        let encoded = parsed
            .data
            .into_iter()
            .find_map(|datum| datum.b64_json)
            .filter(|encoded| !encoded.trim().is_empty())
            .ok_or_else(|| malformed(PROVIDER, "no image data returned"))?;
        let bytes = decode_base64_image(PROVIDER, &encoded)?;
        tracing::info!(size = bytes.len(), "OpenAI image received");
        Ok(bytes)
    }
}
