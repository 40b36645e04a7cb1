use crate::api::{AppError, AppState};
use crate::core::assembler::Recommendation;
use crate::core::diagnostics::{Diagnostics, HealthStatus, TableReport};
use crate::core::profile::Answers;
use axum::extract::{Json, State};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    details: String,
    tables: Vec<TableReport>,
}

/// Scoring is CPU-bound, so it runs on the blocking pool.
async fn recommend(state: Arc<AppState>, answers: Answers) -> Result<Recommendation, AppError> {
    let recommendation = tokio::task::spawn_blocking(move || state.recommender.recommend(&answers)).await?;
    Ok(recommendation)
}

pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Json(answers): Json<Answers>,
) -> Result<Json<Recommendation>, AppError> {
    recommend(state, answers).await.map(Json)
}

/// Same pipeline as `/submit_quiz`, with no answers at all.
pub async fn test_quiz(State(state): State<Arc<AppState>>) -> Result<Json<Recommendation>, AppError> {
    recommend(state, Answers::new()).await.map(Json)
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let catalog = state.recommender.catalog();
    let (s, d) = match Diagnostics::check_health(catalog) {
        HealthStatus::Healthy => ("healthy", "All tables loaded".to_string()),
        HealthStatus::Degraded(msg) => ("degraded", msg),
    };
    Json(HealthResponse {
        status: s.to_string(),
        details: d,
        tables: Diagnostics::tables(catalog),
    })
}
