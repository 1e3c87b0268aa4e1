//! # contract: capability interfaces for generative providers and object storage
//!
//! This module defines the three seams the pipeline talks through:
//!   - [`ImageGenerator`]: turns a prompt into raw image bytes (one implementation per provider)
//!   - [`TextGenerator`]: turns a prompt into raw text (used for captions)
//!   - [`ObjectStore`]: bucket existence/creation, object upload and public URL construction
//!
//! Concrete network clients live in the `poster-forge` binary crate. The core only depends
//! on these traits, so every stage of the pipeline can be driven by mocks in tests.
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`; with the `test-export-mocks` feature (on by default)
//!   dependents get `MockImageGenerator`, `MockTextGenerator` and `MockObjectStore`.
//!
//! ## Errors
//! - Providers fail with [`ProviderError`]; storage fails with [`StorageError`].
//! - A create call racing another creator must report [`StorageError::AlreadyExists`], which the
//!   provisioner treats as success.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use thiserror::Error;

/// Failure of an external generative provider (network, auth, quota, malformed response).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} returned a malformed response: {message}")]
    Malformed { provider: String, message: String },

    #[error("provider returned an empty image")]
    EmptyImage,

    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of the object-storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket '{0}' already exists")]
    AlreadyExists(String),

    #[error("storage request failed: {0}")]
    Request(String),

    #[error("storage returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),
}

/// Constraints applied when a bucket has to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketOptions {
    /// Objects are readable without credentials.
    pub public: bool,
    /// Maximum object size in bytes.
    pub file_size_limit: u64,
    pub allowed_mime_types: Vec<String>,
}

/// Options for a single object write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Replace an existing object stored under the same key.
    pub upsert: bool,
}

/// What the storage service reports about a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketInfo {
    pub name: String,
    pub public: bool,
}

/// Image generation backend. Exactly one implementation is active per deployment.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate a single image for `prompt` and return its encoded bytes.
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Text generation backend used for captions.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate free-form text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Object storage with named, optionally public, buckets.
///
/// The implementor owns transport and authentication; the trait only exposes the
/// operations the pipeline needs. Buckets are never deleted through this interface.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Look up a bucket. `Ok(None)` means the bucket does not exist.
    async fn get_bucket(&self, name: &str) -> Result<Option<BucketInfo>, StorageError>;

    /// Create a bucket. Must return [`StorageError::AlreadyExists`] when another
    /// caller created it first.
    async fn create_bucket(
        &self,
        name: &str,
        options: &BucketOptions,
    ) -> Result<BucketInfo, StorageError>;

    /// Write `bytes` under `key`. No partial-write recovery is attempted.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<(), StorageError>;

    /// Public URL of an object in a public bucket. Pure string construction.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
