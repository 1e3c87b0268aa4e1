//! # storage: idempotent bucket provisioning and poster persistence
//!
//! [`StorageProvisioner`] wraps an [`ObjectStore`] with the pipeline's storage rules:
//!   - `ensure_bucket` checks for the bucket first and only then creates it. A create call that
//!     loses a race against another request (`AlreadyExists`) counts as success, so the
//!     operation can be repeated any number of times. No lock is taken.
//!   - `upload` writes an object once; there is no partial-write recovery.
//!   - `resolve_public_url` is pure construction from bucket and key.
//!
//! Every call to the store is bounded by the configured storage timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::contract::{BucketOptions, ObjectStore, StorageError, UploadOptions};

/// MIME type of every generated poster.
pub const CONTENT_TYPE_PNG: &str = "image/png";

/// Storage key for a poster generated at `unix_millis`.
pub fn object_key(unix_millis: i64) -> String {
    format!("poster-{unix_millis}.png")
}

/// Outcome of [`StorageProvisioner::ensure_bucket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketStatus {
    Created,
    AlreadyExisted,
}

impl BucketStatus {
    pub fn created(self) -> bool {
        matches!(self, BucketStatus::Created)
    }
}

/// A poster persisted to public storage. Immutable once uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub key: String,
    pub public_url: String,
}

pub struct StorageProvisioner {
    store: Arc<dyn ObjectStore>,
    timeout: Duration,
}

impl StorageProvisioner {
    pub fn new(store: Arc<dyn ObjectStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(StorageError::Timeout(self.timeout)))
    }

    /// Make sure bucket `name` exists, creating it with `options` when absent.
    pub async fn ensure_bucket(
        &self,
        name: &str,
        options: &BucketOptions,
    ) -> Result<BucketStatus, StorageError> {
        match self.bounded(self.store.get_bucket(name)).await {
            Ok(Some(_)) => {
                info!(bucket = name, "[STORAGE] Bucket already exists");
                return Ok(BucketStatus::AlreadyExisted);
            }
            Ok(None) => {
                info!(bucket = name, "[STORAGE] Bucket not found, creating");
            }
            Err(e) => {
                // The create call below decides the outcome.
                warn!(bucket = name, error = %e, "[STORAGE] Bucket lookup failed, attempting create");
            }
        }

        match self.bounded(self.store.create_bucket(name, options)).await {
            Ok(_) => {
                info!(
                    bucket = name,
                    public = options.public,
                    file_size_limit = options.file_size_limit,
                    "[STORAGE] Bucket created"
                );
                Ok(BucketStatus::Created)
            }
            Err(StorageError::AlreadyExists(_)) => {
                info!(bucket = name, "[STORAGE] Bucket created concurrently, treating as existing");
                Ok(BucketStatus::AlreadyExisted)
            }
            Err(e) => {
                error!(bucket = name, error = %e, "[STORAGE][ERROR] Bucket creation failed");
                Err(e)
            }
        }
    }

    /// Write `bytes` to `bucket/key`.
    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        info!(bucket, key, size = bytes.len(), content_type, "[STORAGE] Uploading object");
        self.bounded(self.store.put_object(bucket, key, bytes, content_type, options))
            .await
            .map_err(|e| {
                error!(bucket, key, error = %e, "[STORAGE][ERROR] Upload failed");
                e
            })
    }

    pub fn resolve_public_url(&self, bucket: &str, key: &str) -> String {
        self.store.public_url(bucket, key)
    }
}
