use async_trait::async_trait;
use poster_forge_core::contract::{ImageGenerator, ProviderError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{bare_model_name, decode_base64_image, malformed, response_json_or_error, transport_error};
use crate::load_config::{ImageProviderConfig, Secret};

const PROVIDER: &str = "imagen";

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

/// Multimodal model API (`models/{model}:predict`), one square sample per call.
pub struct ImagenClient {
    http: Client,
    endpoint: String,
    api_key: Secret,
}

impl ImagenClient {
    pub fn new(http: Client, config: &ImageProviderConfig) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}/models/{}:predict",
                config.api_base,
                bare_model_name(&config.model)
            ),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        tracing::info!(endpoint = %self.endpoint, "Requesting image from Imagen");
        let payload = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "1:1",
            },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.expose())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let parsed: PredictResponse = response_json_or_error(PROVIDER, response).await?;

        let encoded = parsed
            .predictions
            .into_iter()
            .find_map(|prediction| prediction.bytes_base64_encoded)
            .ok_or_else(|| malformed(PROVIDER, "Imagen did not return an image"))?;
        let bytes = decode_base64_image(PROVIDER, &encoded)?;
        tracing::info!(size = bytes.len(), "Imagen image received");
        Ok(bytes)
    }
}
