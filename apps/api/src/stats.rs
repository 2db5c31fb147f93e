//! Aggregate statistics for the recruiter dashboard.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_candidates: i64,
    pub total_processes: i64,
    pub processes_by_stage: BTreeMap<String, i64>,
    pub cv_bytes_stored: i64,
}

/// GET /api/v1/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let total_candidates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
        .fetch_one(&state.db)
        .await?;

    let cv_bytes_stored: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(cv_size_bytes), 0)::BIGINT FROM candidates")
            .fetch_one(&state.db)
            .await?;

    let stage_counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT stage, COUNT(*) FROM selection_processes GROUP BY stage ORDER BY stage",
    )
    .fetch_all(&state.db)
    .await?;

    let total_processes = stage_counts.iter().map(|(_, n)| n).sum();
    let processes_by_stage = stage_counts.into_iter().collect();

    Ok(Json(StatsResponse {
        total_candidates,
        total_processes,
        processes_by_stage,
        cv_bytes_stored,
    }))
}
