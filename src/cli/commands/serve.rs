//! HTTP API server.
//!
//! Exposes blog generation and the transcript probe over REST.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{BlogError, ErrorKind};
use crate::orchestrator::{GenerationRequest, Orchestrator};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
pub(crate) struct AppState {
    orchestrator: Arc<Orchestrator>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Generate, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidblog doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let app = router(Arc::new(AppState { orchestrator }));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("vidblog API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Info", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Generate blog", "POST /generate-blog");
    Output::kv("Probe transcript", "GET  /test-transcript/{video_id}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with permissive CORS.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/generate-blog", post(generate_blog))
        .route("/test-transcript/{video_id}", get(test_transcript))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
struct BlogResponse {
    blog_content: String,
    video_url: String,
    processing_time: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    detail: String,
}

/// Map a pipeline error to a status code and a client-safe body.
fn error_response(err: &BlogError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, detail) = match (err.kind(), err) {
        (ErrorKind::InvalidReference, _) => (StatusCode::BAD_REQUEST, err.to_string()),
        (ErrorKind::TranscriptUnavailable, BlogError::TranscriptUnavailable(msg)) => {
            (StatusCode::BAD_REQUEST, format!("Transcript error: {}", msg))
        }
        (ErrorKind::GenerationFailure, _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error: blog generation failed".to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    };

    (status, Json(ErrorResponse { detail }))
}

// === Handlers ===

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "YouTube to Blog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "generate_blog": "/generate-blog",
            "test_transcript": "/test-transcript/{video_id}"
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "The server is running smoothly.",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn generate_blog(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerationRequest>,
) -> Response {
    info!("Generating blog for {}", req.video_url);

    // The run lives on its own task so a client disconnect, which drops this
    // handler future, does not cancel stages already in flight.
    let orchestrator = state.orchestrator.clone();
    let handle = tokio::spawn(async move { orchestrator.run(&req).await });
    let outcome = handle
        .await
        .unwrap_or_else(|e| Err(BlogError::Internal(format!("Pipeline task failed: {}", e))));

    match outcome {
        Ok(result) => Json(BlogResponse {
            processing_time: result.elapsed_seconds(),
            blog_content: result.article.text,
            video_url: result.video_url,
        })
        .into_response(),
        Err(e) => {
            if e.kind() == ErrorKind::InvalidReference || e.kind() == ErrorKind::TranscriptUnavailable {
                info!("Rejected request: {}", e);
            } else {
                error!("Blog generation failed: {}", e);
            }
            error_response(&e).into_response()
        }
    }
}

async fn test_transcript(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> impl IntoResponse {
    Json(state.orchestrator.probe(&video_id).await)
}
