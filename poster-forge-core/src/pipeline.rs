//! High-level pipeline: brief → prompts → image → storage → captions.
//!
//! The [`Orchestrator`] owns one collaborator per stage and runs each request through:
//!
//! `Idle → ComposingPrompts → GeneratingImage → Persisting → GeneratingCaptions → Done | Failed`
//!
//! # Failure rules
//! - Validation happens before any stage runs; an invalid brief never reaches a provider.
//! - A failed or timed-out image provider call abandons the request. Nothing is uploaded.
//! - A failed bucket ensure or upload abandons the request.
//! - The caption stage cannot fail: provider errors are absorbed by the fallback captions.
//!
//! [`Orchestrator::run`] drives the image branch and the caption branch concurrently since they
//! share no data beyond the request. A failed image branch ends the run at once and drops the
//! caption branch. Each request is independent; the storage service is the only
//! state shared between requests.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::caption::{CaptionSet, CaptionWriter};
use crate::config::PipelineConfig;
use crate::contract::{ImageGenerator, ObjectStore, ProviderError, StorageError, TextGenerator, UploadOptions};
use crate::prompt::{compose_caption_prompt, compose_image_prompt};
use crate::request::{PosterRequest, ValidationError};
use crate::storage::{object_key, BucketStatus, GeneratedAsset, StorageProvisioner, CONTENT_TYPE_PNG};
use crate::template;

/// States a request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    ComposingPrompts,
    GeneratingImage,
    Persisting,
    GeneratingCaptions,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ComposingPrompts => "composing_prompts",
            Stage::GeneratingImage => "generating_image",
            Stage::Persisting => "persisting",
            Stage::GeneratingCaptions => "generating_captions",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why a request ended in [`Stage::Failed`].
#[derive(Debug, Error)]
pub enum PosterError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("image generation failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl PosterError {
    /// The stage that was running when the request failed.
    pub fn stage(&self) -> Stage {
        match self {
            PosterError::Validation(_) => Stage::Idle,
            PosterError::Provider(_) => Stage::GeneratingImage,
            PosterError::Storage(_) => Stage::Persisting,
        }
    }
}

/// The terminal artifact of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterResult {
    pub image_url: String,
    #[serde(flatten)]
    pub captions: CaptionSet,
}

fn enter(stage: Stage) {
    info!(stage = %stage, "[PIPELINE] Stage entered");
}

fn fail(error: PosterError) -> PosterError {
    error!(stage = %error.stage(), error = %error, "[PIPELINE][ERROR] Request failed");
    enter(Stage::Failed);
    error
}

pub struct Orchestrator {
    config: PipelineConfig,
    images: Arc<dyn ImageGenerator>,
    captions: CaptionWriter,
    storage: StorageProvisioner,
}

impl Orchestrator {
    pub fn new(
        config: PipelineConfig,
        images: Arc<dyn ImageGenerator>,
        text: Arc<dyn TextGenerator>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let captions = CaptionWriter::new(text, config.timeouts.caption);
        let storage = StorageProvisioner::new(store, config.timeouts.storage);
        Self {
            config,
            images,
            captions,
            storage,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline and assemble the poster URL with its captions.
    pub async fn run(&self, request: &PosterRequest) -> Result<PosterResult, PosterError> {
        request.validate().map_err(|e| fail(e.into()))?;

        // An image or storage failure drops the pending caption branch.
        let (asset, captions) = tokio::try_join!(self.render_validated(request), async {
            Ok::<_, PosterError>(self.write_captions(request).await)
        })?;

        enter(Stage::Done);
        Ok(PosterResult {
            image_url: asset.public_url,
            captions,
        })
    }

    /// Validate, generate the image and persist it. Returns the stored asset.
    pub async fn render_poster(&self, request: &PosterRequest) -> Result<GeneratedAsset, PosterError> {
        request.validate().map_err(|e| fail(e.into()))?;
        self.render_validated(request).await
    }

    async fn render_validated(&self, request: &PosterRequest) -> Result<GeneratedAsset, PosterError> {
        enter(Stage::ComposingPrompts);
        let template = template::lookup(&request.business_type);
        if template.generic {
            info!(business_type = %request.business_type, "[PIPELINE] Unknown business type, using generic template");
        }
        let prompt = compose_image_prompt(request, &template);

        enter(Stage::GeneratingImage);
        let limit = self.config.timeouts.image;
        let bytes = tokio::time::timeout(limit, self.images.generate(&prompt))
            .await
            .unwrap_or(Err(ProviderError::Timeout(limit)))
            .map_err(|e| fail(e.into()))?;
        if bytes.is_empty() {
            return Err(fail(ProviderError::EmptyImage.into()));
        }
        info!(size = bytes.len(), "[PIPELINE] Image generated");

        enter(Stage::Persisting);
        let bucket = self.config.bucket.as_str();
        self.storage
            .ensure_bucket(bucket, &self.config.bucket_options)
            .await
            .map_err(|e| fail(e.into()))?;
        let key = object_key(Utc::now().timestamp_millis());
        self.storage
            .upload(bucket, &key, &bytes, CONTENT_TYPE_PNG, &UploadOptions { upsert: true })
            .await
            .map_err(|e| fail(e.into()))?;
        let public_url = self.storage.resolve_public_url(bucket, &key);
        info!(bucket, key = %key, url = %public_url, "[PIPELINE] Poster persisted");

        Ok(GeneratedAsset {
            bytes,
            content_type: CONTENT_TYPE_PNG,
            key,
            public_url,
        })
    }

    /// Caption stage on its own. Never fails.
    pub async fn write_captions(&self, request: &PosterRequest) -> CaptionSet {
        enter(Stage::GeneratingCaptions);
        let prompt = compose_caption_prompt(request);
        self.captions
            .generate(&prompt, &request.headline, request.details())
            .await
    }

    /// Provision the configured bucket.
    pub async fn setup_bucket(&self) -> Result<BucketStatus, StorageError> {
        self.storage
            .ensure_bucket(&self.config.bucket, &self.config.bucket_options)
            .await
    }
}
