use async_trait::async_trait;
use poster_forge_core::contract::{ImageGenerator, ProviderError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::json;

use super::{ensure_success, malformed, transport_error};
use crate::load_config::{ImageProviderConfig, Secret};

const PROVIDER: &str = "huggingface";

/// Appended to every prompt; steers diffusion models towards advertisement aesthetics.
const PROMPT_SUFFIX: &str = ", professional marketing poster, vibrant colors, high quality, \
8k resolution, sharp focus, professional photography, commercial advertisement style, \
clean composition, studio lighting";

/// Diffusion-model inference service. Answers with the raw image bytes.
pub struct HuggingFaceClient {
    http: Client,
    endpoint: String,
    api_key: Secret,
}

impl HuggingFaceClient {
    pub fn new(http: Client, config: &ImageProviderConfig) -> Self {
        Self {
            http,
            endpoint: format!("{}/models/{}", config.api_base, config.model),
            api_key: config.api_key.clone(),
        }
    }

    pub fn enhance_prompt(prompt: &str) -> String {
        format!("{}{PROMPT_SUFFIX}", prompt.trim_end())
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        tracing::info!(endpoint = %self.endpoint, "Requesting image from Hugging Face");
        let payload = json!({
            "inputs": Self::enhance_prompt(prompt),
            "parameters": {
                "width": 1024,
                "height": 1024,
                "num_inference_steps": 28,
                "guidance_scale": 3.5,
            }
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let response = ensure_success(PROVIDER, response).await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);
        if is_json {
            let body = response.text().await.unwrap_or_default();
            return Err(malformed(PROVIDER, format!("expected image bytes, got JSON: {body}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        if bytes.is_empty() {
            return Err(ProviderError::EmptyImage);
        }
        tracing::info!(size = bytes.len(), "Hugging Face image received");
        Ok(bytes.to_vec())
    }
}
