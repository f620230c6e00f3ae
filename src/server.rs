//! HTTP dashboard
//!
//! Every request to `/` or `/api/dashboard` re-runs the whole pipeline.
//! A failed run is answered with 503 and no recommendation.

use crate::dashboard::{render_error_html, render_html, Dashboard};
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/dashboard", get(api_dashboard))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(pipeline: Arc<Pipeline>, bind: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "Dashboard listening");
    axum::serve(listener, router(AppState { pipeline })).await?;
    Ok(())
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}

async fn index(State(state): State<AppState>) -> Response {
    match state.pipeline.run().await {
        Ok(run) => Html(render_html(&Dashboard::from_run(&run))).into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, Html(render_error_html(&e))).into_response(),
    }
}

async fn api_dashboard(
    State(state): State<AppState>,
) -> Result<Json<Dashboard>, PipelineError> {
    let run = state.pipeline.run().await?;
    Ok(Json(Dashboard::from_run(&run)))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
