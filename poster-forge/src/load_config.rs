/// `load_config` module: loads a static YAML config, injects secrets from the environment and
/// validates the result into a typed [`AppConfig`].
///
/// This module is the only place where untrusted YAML is parsed and mapped to strongly-typed
/// internal structs. Validation happens here, at startup: a missing credential for the selected
/// image provider, the caption provider or the storage service fails loading with an error naming
/// every missing environment variable, instead of failing lazily on the first request.
///
/// # Secrets
/// Secrets never live in the YAML file. They are read from the environment:
/// - `SUPABASE_SERVICE_ROLE_KEY` (always), `SUPABASE_URL` (when `storage.url` is absent)
/// - `HUGGINGFACE_API_KEY`, `OPENAI_API_KEY` or `GEMINI_API_KEY`, depending on `image.provider`
/// - `GEMINI_API_KEY` for captions
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{anyhow, bail, Context, Result};
use poster_forge_core::config::{PipelineConfig, Timeouts, DEFAULT_BUCKET, DEFAULT_FILE_SIZE_LIMIT};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// A credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Image backends that can be selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProviderKind {
    /// Diffusion-model inference service.
    Huggingface,
    /// Commercial image-generation API.
    Openai,
    /// Multimodal model API.
    Imagen,
}

impl ImageProviderKind {
    pub fn api_key_var(self) -> &'static str {
        match self {
            ImageProviderKind::Huggingface => "HUGGINGFACE_API_KEY",
            ImageProviderKind::Openai => "OPENAI_API_KEY",
            ImageProviderKind::Imagen => "GEMINI_API_KEY",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            ImageProviderKind::Huggingface => "black-forest-labs/FLUX.1-dev",
            ImageProviderKind::Openai => "dall-e-3",
            ImageProviderKind::Imagen => "imagen-4.0-generate-001",
        }
    }

    fn default_api_base(self) -> &'static str {
        match self {
            ImageProviderKind::Huggingface => "https://router.huggingface.co/hf-inference",
            ImageProviderKind::Openai => "https://api.openai.com/v1",
            ImageProviderKind::Imagen => GEMINI_API_BASE,
        }
    }
}

impl fmt::Display for ImageProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageProviderKind::Huggingface => "huggingface",
            ImageProviderKind::Openai => "openai",
            ImageProviderKind::Imagen => "imagen",
        };
        f.write_str(name)
    }
}

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_CAPTION_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProviderConfig {
    pub kind: ImageProviderKind,
    pub api_key: Secret,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextProviderConfig {
    pub api_key: Secret,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Base URL of the storage service project, without the `/storage/v1` suffix.
    pub url: String,
    pub service_key: Secret,
}

/// Fully validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub image: ImageProviderConfig,
    pub captions: TextProviderConfig,
    pub storage: StorageConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn trace_loaded(&self) {
        info!(
            bind = %self.bind,
            image_provider = %self.image.kind,
            image_model = %self.image.model,
            caption_model = %self.captions.model,
            storage_url = %self.storage.url,
            "Loaded AppConfig"
        );
        self.pipeline.trace_loaded();
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerSection {
    pub bind: Option<SocketAddr>,
}

#[derive(Debug, Deserialize)]
pub struct ImageSection {
    pub provider: ImageProviderKind,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionSection {
    pub model: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageSection {
    pub url: Option<String>,
    pub bucket: Option<String>,
    pub file_size_limit: Option<u64>,
    pub allowed_mime_types: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PipelineSection {
    pub image_timeout_secs: Option<u64>,
    pub storage_timeout_secs: Option<u64>,
    pub caption_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    server: ServerSection,
    image: ImageSection,
    #[serde(default)]
    captions: CaptionSection,
    #[serde(default)]
    storage: StorageSection,
    #[serde(default)]
    pipeline: PipelineSection,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn trim_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Loads a static YAML config file (no secrets) and injects required env vars for secrets.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow!("Failed to read config file {:?}: {}", path_ref, e));
        }
    };

    parse_config(&config_content)
}

/// Parse YAML content and resolve it against the process environment.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = match serde_yaml::from_str(content) {
        Ok(conf) => {
            info!("Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, "Failed to parse config YAML");
            return Err(anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let mut missing: Vec<&str> = Vec::new();
    let mut require = |key: &'static str| -> Secret {
        match non_empty_env(key) {
            Some(value) => Secret(value),
            None => {
                if !missing.contains(&key) {
                    missing.push(key);
                }
                Secret(String::new())
            }
        }
    };

    let image_key = require(raw.image.provider.api_key_var());
    let caption_key = require("GEMINI_API_KEY");
    let service_key = require("SUPABASE_SERVICE_ROLE_KEY");
    let storage_url = match raw.storage.url.as_deref().map(trim_base).filter(|u| !u.is_empty()) {
        Some(url) => url,
        None => trim_base(require("SUPABASE_URL").expose()),
    };

    if !missing.is_empty() {
        error!(missing = ?missing, "Required environment variables are not set");
        bail!(
            "Missing required environment variables: {}",
            missing.join(", ")
        );
    }

    if !storage_url.starts_with("http://") && !storage_url.starts_with("https://") {
        bail!("storage url must be an http(s) URL, got {storage_url:?}");
    }

    let provider = raw.image.provider;
    let image = ImageProviderConfig {
        kind: provider,
        api_key: image_key,
        model: raw
            .image
            .model
            .unwrap_or_else(|| provider.default_model().to_string()),
        api_base: raw
            .image
            .api_base
            .as_deref()
            .map(trim_base)
            .unwrap_or_else(|| provider.default_api_base().to_string()),
    };

    let captions = TextProviderConfig {
        api_key: caption_key,
        model: raw
            .captions
            .model
            .unwrap_or_else(|| DEFAULT_CAPTION_MODEL.to_string()),
        api_base: raw
            .captions
            .api_base
            .as_deref()
            .map(trim_base)
            .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
    };

    let defaults = PipelineConfig::default();
    let default_timeouts = Timeouts::default();
    let secs = |value: Option<u64>, fallback: Duration| -> Result<Duration> {
        match value {
            Some(0) => bail!("timeouts must be at least one second"),
            Some(s) => Ok(Duration::from_secs(s)),
            None => Ok(fallback),
        }
    };
    let mut bucket_options = defaults.bucket_options.clone();
    bucket_options.file_size_limit = raw
        .storage
        .file_size_limit
        .unwrap_or(DEFAULT_FILE_SIZE_LIMIT);
    if let Some(types) = raw.storage.allowed_mime_types {
        bucket_options.allowed_mime_types = types;
    }
    let pipeline = PipelineConfig {
        bucket: raw
            .storage
            .bucket
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        bucket_options,
        timeouts: Timeouts {
            image: secs(raw.pipeline.image_timeout_secs, default_timeouts.image)
                .context("pipeline.image_timeout_secs")?,
            storage: secs(raw.pipeline.storage_timeout_secs, default_timeouts.storage)
                .context("pipeline.storage_timeout_secs")?,
            caption: secs(raw.pipeline.caption_timeout_secs, default_timeouts.caption)
                .context("pipeline.caption_timeout_secs")?,
        },
    };

    let bind = match raw.server.bind {
        Some(bind) => bind,
        None => DEFAULT_BIND
            .parse()
            .context("default bind address is not a socket address")?,
    };

    let config = AppConfig {
        bind,
        image,
        captions,
        storage: StorageConfig {
            url: storage_url,
            service_key,
        },
        pipeline,
    };
    config.trace_loaded();
    Ok(config)
}
