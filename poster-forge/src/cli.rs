/// # poster-forge CLI
///
/// Command parsing and wiring for the `poster-forge` binary. Business rules (templates, prompts,
/// provisioning, caption fallback, stage ordering) live in [`poster_forge_core`]; this module
/// only loads configuration, constructs the concrete clients and hands them to the
/// [`Orchestrator`].
///
/// ## Commands
/// - `serve`: run the HTTP API.
/// - `generate`: run the whole pipeline once and print the result as JSON.
/// - `setup-bucket`: provision the storage bucket.
/// - `templates`: list known business types. Needs no configuration.
///
/// For programmatic and integration use, call [`run`] with a constructed [`Cli`].
use crate::load_config::{load_config, AppConfig};
use crate::providers::{build_image_generator, build_text_generator};
use crate::server::{run_server, AppState};
use crate::storage::SupabaseStorage;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use poster_forge_core::pipeline::Orchestrator;
use poster_forge_core::request::PosterRequest;
use poster_forge_core::template::TEMPLATES;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// CLI for poster-forge: marketing posters and captions from a short brief.
#[derive(Parser)]
#[clap(
    name = "poster-forge",
    version,
    about = "Generate marketing posters and social captions, persisted to public object storage"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Generate one poster with captions and print the result as JSON
    Generate {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        #[clap(long)]
        business_type: String,
        #[clap(long)]
        headline: String,
        #[clap(long)]
        details: Option<String>,
        #[clap(long, default_value = "modern")]
        style: String,
        #[clap(long, default_value = "bright")]
        colors: String,
        #[clap(long)]
        logo_url: Option<String>,
    },
    /// Create the storage bucket if it does not exist yet
    SetupBucket {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// List known business types and their visual styles
    Templates,
}

/// Construct the concrete clients for `config` and assemble the pipeline.
pub fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator> {
    let http = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let images = build_image_generator(&config.image, http.clone());
    let text = build_text_generator(&config.captions, http.clone());
    let store = Arc::new(SupabaseStorage::new(http, &config.storage));
    Ok(Orchestrator::new(config.pipeline.clone(), images, text, store))
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Serve { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "serve", "Starting HTTP API");
            let orchestrator = build_orchestrator(&config)?;
            run_server(config.bind, AppState::new(orchestrator)).await
        }
        Commands::Generate {
            config,
            business_type,
            headline,
            details,
            style,
            colors,
            logo_url,
        } => {
            let config = load_config(config)?;
            tracing::info!(command = "generate", business_type = %business_type, "Generating poster");
            let orchestrator = build_orchestrator(&config)?;
            let request = PosterRequest {
                business_type,
                headline,
                details,
                style,
                color_theme: colors,
                logo_url,
            };
            match orchestrator.run(&request).await {
                Ok(result) => {
                    tracing::info!(command = "generate", image_url = %result.image_url, "Poster generated");
                    let rendered = serde_json::to_string_pretty(&result)
                        .context("Failed to serialise poster result")?;
                    println!("{rendered}");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "generate", stage = %e.stage(), error = %e, "Poster generation failed");
                    Err(anyhow!(e))
                }
            }
        }
        Commands::SetupBucket { config } => {
            let config = load_config(config)?;
            let orchestrator = build_orchestrator(&config)?;
            let bucket = config.pipeline.bucket.clone();
            let status = orchestrator
                .setup_bucket()
                .await
                .with_context(|| format!("Failed to provision bucket '{bucket}'"))?;
            tracing::info!(command = "setup-bucket", bucket = %bucket, ?status, "Bucket ready");
            println!(
                "{}",
                serde_json::json!({ "created": status.created(), "bucket": bucket })
            );
            Ok(())
        }
        Commands::Templates => {
            for (business_type, fragment) in TEMPLATES {
                println!("{business_type}: {fragment}");
            }
            Ok(())
        }
    }
}
