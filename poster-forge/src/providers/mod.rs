//! # providers: HTTP clients for the generative backends
//!
//! One client per image backend, plus the caption text backend. Each implements a capability
//! trait from [`poster_forge_core::contract`], so the orchestrator never sees which backend is
//! active. The backend is chosen once at startup from [`ImageProviderConfig::kind`].
//!
//! Clients do not retry and do not fail over to another backend. Any transport error, non-2xx
//! status, or response without usable image data becomes a [`ProviderError`] naming the backend.
//! Timeouts are applied by the pipeline around each call.

mod gemini;
mod huggingface;
mod imagen;
mod openai;

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use poster_forge_core::contract::{ImageGenerator, ProviderError, TextGenerator};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::load_config::{ImageProviderConfig, ImageProviderKind, TextProviderConfig};

pub use gemini::GeminiTextClient;
pub use huggingface::HuggingFaceClient;
pub use imagen::ImagenClient;
pub use openai::OpenAiImageClient;

/// Build the image backend selected by `config`.
pub fn build_image_generator(config: &ImageProviderConfig, http: Client) -> Arc<dyn ImageGenerator> {
    tracing::info!(provider = %config.kind, model = %config.model, "Selected image provider");
    match config.kind {
        ImageProviderKind::Huggingface => Arc::new(HuggingFaceClient::new(http, config)),
        ImageProviderKind::Openai => Arc::new(OpenAiImageClient::new(http, config)),
        ImageProviderKind::Imagen => Arc::new(ImagenClient::new(http, config)),
    }
}

/// Build the caption text backend.
pub fn build_text_generator(config: &TextProviderConfig, http: Client) -> Arc<dyn TextGenerator> {
    tracing::info!(model = %config.model, "Selected caption provider");
    Arc::new(GeminiTextClient::new(http, config))
}

fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}

pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    tracing::error!(provider, error = %err, "Provider request failed");
    ProviderError::Request {
        provider: provider.to_string(),
        message: err.to_string(),
    }
}

pub(crate) fn malformed(provider: &str, message: impl Into<String>) -> ProviderError {
    let message = message.into();
    tracing::error!(provider, message = %message, "Provider returned a malformed response");
    ProviderError::Malformed {
        provider: provider.to_string(),
        message,
    }
}

/// Pass 2xx responses through; turn anything else into [`ProviderError::Status`].
pub(crate) async fn ensure_success(provider: &str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::error!(provider, status = status.as_u16(), "Provider returned an error status");
    Err(ProviderError::Status {
        provider: provider.to_string(),
        status: status.as_u16(),
        body: truncate_text(&body, 512),
    })
}

pub(crate) async fn response_json_or_error<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, ProviderError> {
    let response = ensure_success(provider, response).await?;
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))?;
    serde_json::from_str(&body).map_err(|e| malformed(provider, format!("invalid JSON payload: {e}")))
}

pub(crate) fn decode_base64_image(provider: &str, encoded: &str) -> Result<Vec<u8>, ProviderError> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| malformed(provider, format!("invalid base64 image: {e}")))?;
    if bytes.is_empty() {
        return Err(ProviderError::EmptyImage);
    }
    Ok(bytes)
}

/// Model names may be given with or without the `models/` prefix.
pub(crate) fn bare_model_name(raw: &str) -> &str {
    raw.trim().trim_start_matches("models/")
}
