use std::time::Duration;

use tracing::{debug, info};

use crate::contract::BucketOptions;

/// Bucket every poster is stored in.
pub const DEFAULT_BUCKET: &str = "posters";
/// 50MB, the per-object limit applied when the bucket is created.
pub const DEFAULT_FILE_SIZE_LIMIT: u64 = 52_428_800;

/// Bounded time for each outbound call, per kind of collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub image: Duration,
    pub storage: Duration,
    pub caption: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            image: Duration::from_secs(120),
            storage: Duration::from_secs(30),
            caption: Duration::from_secs(30),
        }
    }
}

/// Everything the orchestrator needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub bucket: String,
    pub bucket_options: BucketOptions,
    pub timeouts: Timeouts,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            bucket_options: BucketOptions {
                public: true,
                file_size_limit: DEFAULT_FILE_SIZE_LIMIT,
                allowed_mime_types: vec!["image/png".to_string(), "image/jpeg".to_string()],
            },
            timeouts: Timeouts::default(),
        }
    }
}

impl PipelineConfig {
    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.bucket,
            public = self.bucket_options.public,
            file_size_limit = self.bucket_options.file_size_limit,
            "Loaded PipelineConfig"
        );
        debug!(?self, "PipelineConfig loaded (full debug)");
    }
}
