use poster_forge::load_config::{load_config, ImageProviderKind};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::time::Duration;
use tempfile::NamedTempFile;

const SECRET_VARS: &[&str] = &[
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_URL",
    "HUGGINGFACE_API_KEY",
    "OPENAI_API_KEY",
    "GEMINI_API_KEY",
];

fn clear_secrets() {
    for var in SECRET_VARS {
        env::remove_var(var);
    }
}

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

/// A file that only selects the provider gets every other field from defaults.
#[tokio::test]
#[serial]
async fn test_load_config_minimal_file_uses_defaults() {
    clear_secrets();
    env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-role");
    env::set_var("SUPABASE_URL", "https://project.supabase.co/");
    env::set_var("HUGGINGFACE_API_KEY", "hf-key");
    env::set_var("GEMINI_API_KEY", "gemini-key");

    let file = config_file("image:\n  provider: huggingface\n");
    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.bind.to_string(), "0.0.0.0:3000");
    assert_eq!(config.image.kind, ImageProviderKind::Huggingface);
    assert_eq!(config.image.api_key.expose(), "hf-key");
    assert_eq!(config.image.model, "black-forest-labs/FLUX.1-dev");
    assert_eq!(config.captions.api_key.expose(), "gemini-key");
    assert_eq!(config.captions.model, "gemini-1.5-flash");
    assert_eq!(config.storage.url, "https://project.supabase.co");
    assert_eq!(config.storage.service_key.expose(), "service-role");

    assert_eq!(config.pipeline.bucket, "posters");
    assert!(config.pipeline.bucket_options.public);
    assert_eq!(config.pipeline.bucket_options.file_size_limit, 52_428_800);
    assert_eq!(
        config.pipeline.bucket_options.allowed_mime_types,
        vec!["image/png".to_string(), "image/jpeg".to_string()]
    );
    assert_eq!(config.pipeline.timeouts.image, Duration::from_secs(120));
    assert_eq!(config.pipeline.timeouts.storage, Duration::from_secs(30));
    assert_eq!(config.pipeline.timeouts.caption, Duration::from_secs(30));
}

#[tokio::test]
#[serial]
async fn test_load_config_full_file_overrides_defaults() {
    clear_secrets();
    env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-role");
    env::set_var("OPENAI_API_KEY", "openai-key");
    env::set_var("GEMINI_API_KEY", "gemini-key");

    let yaml = r#"
server:
  bind: "127.0.0.1:8080"
image:
  provider: openai
  api_base: "http://localhost:9000/v1/"
captions:
  model: "models/gemini-2.0-flash"
storage:
  url: "http://localhost:54321"
  bucket: campaign-posters
  file_size_limit: 1048576
  allowed_mime_types: ["image/png"]
pipeline:
  image_timeout_secs: 60
  storage_timeout_secs: 5
  caption_timeout_secs: 10
"#;
    let file = config_file(yaml);
    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.bind.to_string(), "127.0.0.1:8080");
    assert_eq!(config.image.kind, ImageProviderKind::Openai);
    assert_eq!(config.image.model, "dall-e-3");
    assert_eq!(config.image.api_base, "http://localhost:9000/v1");
    assert_eq!(config.captions.model, "models/gemini-2.0-flash");
    assert_eq!(config.storage.url, "http://localhost:54321");
    assert_eq!(config.pipeline.bucket, "campaign-posters");
    assert_eq!(config.pipeline.bucket_options.file_size_limit, 1_048_576);
    assert_eq!(
        config.pipeline.bucket_options.allowed_mime_types,
        vec!["image/png".to_string()]
    );
    assert_eq!(config.pipeline.timeouts.image, Duration::from_secs(60));
    assert_eq!(config.pipeline.timeouts.storage, Duration::from_secs(5));
    assert_eq!(config.pipeline.timeouts.caption, Duration::from_secs(10));
}

/// The error names every missing variable so a deployment can be fixed in one pass.
#[tokio::test]
#[serial]
async fn test_load_config_errors_naming_missing_secrets() {
    clear_secrets();
    env::set_var("GEMINI_API_KEY", "gemini-key");

    let file = config_file("image:\n  provider: openai\n");
    let err = load_config(file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("OPENAI_API_KEY"), "got: {msg}");
    assert!(msg.contains("SUPABASE_SERVICE_ROLE_KEY"), "got: {msg}");
    assert!(msg.contains("SUPABASE_URL"), "got: {msg}");
    assert!(!msg.contains("GEMINI_API_KEY"), "got: {msg}");
}

#[tokio::test]
#[serial]
async fn test_load_config_imagen_shares_the_gemini_key() {
    clear_secrets();
    env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-role");
    env::set_var("SUPABASE_URL", "https://project.supabase.co");
    env::set_var("GEMINI_API_KEY", "gemini-key");

    let file = config_file("image:\n  provider: imagen\n");
    let config = load_config(file.path()).expect("Config should load");
    assert_eq!(config.image.kind, ImageProviderKind::Imagen);
    assert_eq!(config.image.api_key.expose(), "gemini-key");
}

#[tokio::test]
#[serial]
async fn test_load_config_rejects_invalid_values() {
    clear_secrets();
    env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-role");
    env::set_var("HUGGINGFACE_API_KEY", "hf-key");
    env::set_var("GEMINI_API_KEY", "gemini-key");

    let cases = [
        (
            "image:\n  provider: huggingface\nstorage:\n  url: \"ftp://storage\"\n",
            "http",
        ),
        (
            "image:\n  provider: huggingface\nstorage:\n  url: \"https://p.supabase.co\"\npipeline:\n  image_timeout_secs: 0\n",
            "image_timeout_secs",
        ),
        ("image:\n  provider: midjourney\n", "YAML"),
        ("storage:\n  url: \"https://p.supabase.co\"\n", "YAML"),
    ];

    for (yaml, expected) in cases {
        let file = config_file(yaml);
        let err = load_config(file.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains(expected), "expected '{expected}' in: {msg}");
    }
}

#[tokio::test]
#[serial]
async fn test_load_config_errors_for_invalid_file() {
    clear_secrets();
    let file = config_file("not-yaml: [:::");
    let err = load_config(file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[tokio::test]
#[serial]
async fn test_load_config_errors_for_missing_file() {
    let err = load_config("/nonexistent/poster-forge.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn secrets_are_redacted_in_debug_output() {
    let secret = poster_forge::load_config::Secret::new("super-secret");
    assert_eq!(format!("{secret:?}"), "Secret(***)");
}
