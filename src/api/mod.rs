pub mod handlers;

use crate::core::pipeline::Recommender;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

// --- App State ---
pub struct AppState {
    pub recommender: Recommender,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Arc<Self> {
        Arc::new(Self { recommender })
    }
}

// --- Errors ---
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Recommendation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        let body = ErrorResponse {
            error: "Internal server error".to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// --- Router ---
pub fn router(state: Arc<AppState>, images_dir: &Path) -> Router {
    Router::new()
        .route("/submit_quiz", post(handlers::submit_quiz))
        .route("/test", get(handlers::test_quiz))
        .route("/health", get(handlers::health_check))
        .nest_service("/images", ServeDir::new(images_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
