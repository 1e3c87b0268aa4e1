//! HTTP surface of the poster pipeline.
//!
//! | Route                   | Body                                                        | Success                     |
//! |-------------------------|-------------------------------------------------------------|-----------------------------|
//! | `POST /generatePoster`  | `{businessType, headline, details, style, colors, logoUrl?}` | `200 {imageUrl}`            |
//! | `POST /generateCaption` | `{businessType, headline, details}`                         | `200 {captions}`            |
//! | `POST /setupBucket`     | none                                                        | `200 {created, bucket}`     |
//!
//! Failures answer `{error}`. Validation messages and unreadable bodies are returned as-is with
//! `400`; provider and storage failures are logged in full and answered with a fixed category
//! message and `500`. `/generateCaption` answers `200` with fallback captions even for a body it
//! cannot read.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use poster_forge_core::caption::fallback_captions;
use poster_forge_core::pipeline::{Orchestrator, PosterError};
use poster_forge_core::request::PosterRequest;
use serde::Serialize;

pub const IMAGE_FAILURE_MESSAGE: &str = "image generation failed";
pub const STORAGE_FAILURE_MESSAGE: &str = "storage operation failed";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub captions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SetupBucketResponse {
    pub created: bool,
    pub bucket: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/generatePoster", post(generate_poster))
        .route("/generateCaption", post(generate_caption))
        .route("/setupBucket", post(setup_bucket))
        .with_state(state)
}

pub async fn generate_poster(
    State(state): State<AppState>,
    body: Result<Json<PosterRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected unreadable poster request");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    tracing::info!(business_type = %request.business_type, "Received poster request");
    match state.orchestrator.render_poster(&request).await {
        Ok(asset) => (
            StatusCode::OK,
            Json(PosterResponse {
                image_url: asset.public_url,
            }),
        )
            .into_response(),
        Err(PosterError::Validation(e)) => {
            tracing::warn!(error = %e, "Rejected poster request");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ PosterError::Provider(_)) => {
            tracing::error!(error = %e, "Poster generation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, IMAGE_FAILURE_MESSAGE)
        }
        Err(e @ PosterError::Storage(_)) => {
            tracing::error!(error = %e, "Poster persistence failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILURE_MESSAGE)
        }
    }
}

pub async fn generate_caption(
    State(state): State<AppState>,
    body: Result<Json<PosterRequest>, JsonRejection>,
) -> impl IntoResponse {
    let captions = match body {
        Ok(Json(request)) => {
            tracing::info!(business_type = %request.business_type, "Received caption request");
            state.orchestrator.write_captions(&request).await.into_captions()
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable caption request, using fallback captions");
            fallback_captions("", "")
        }
    };
    (StatusCode::OK, Json(CaptionResponse { captions }))
}

pub async fn setup_bucket(State(state): State<AppState>) -> impl IntoResponse {
    let bucket = state.orchestrator.config().bucket.clone();
    match state.orchestrator.setup_bucket().await {
        Ok(status) => (
            StatusCode::OK,
            Json(SetupBucketResponse {
                created: status.created(),
                bucket,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(bucket = %bucket, error = %e, "Bucket setup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILURE_MESSAGE)
        }
    }
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
