use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::candidates::repo as candidates;
use crate::errors::AppError;
use crate::models::process::{SelectionProcessRow, Stage};
use crate::processes::repo;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Deserialize)]
pub struct CreateProcessRequest {
    pub candidate_id: Uuid,
    pub position: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ProcessListQuery {
    pub candidate_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct StageUpdateRequest {
    pub stage: String,
}

/// POST /api/v1/processes
///
/// Opens a selection process for an existing candidate, starting at
/// `received`.
pub async fn handle_create_process(
    State(state): State<AppState>,
    Json(req): Json<CreateProcessRequest>,
) -> Result<(StatusCode, Json<SelectionProcessRow>), AppError> {
    if req.position.trim().is_empty() {
        return Err(AppError::Validation("position is required".to_string()));
    }

    candidates::get(&state.db, req.candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", req.candidate_id)))?;

    let row = repo::insert(
        &state.db,
        req.candidate_id,
        &req.position,
        req.notes.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/processes
pub async fn handle_list_processes(
    State(state): State<AppState>,
    Query(params): Query<ProcessListQuery>,
) -> Result<Json<Vec<SelectionProcessRow>>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let rows = repo::list(&state.db, params.candidate_id, limit, offset).await?;
    Ok(Json(rows))
}

/// PATCH /api/v1/processes/:id/stage
///
/// Stage transition. Unknown stage values are a validation error, and a
/// process already at `hired` or `rejected` cannot move again.
pub async fn handle_update_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StageUpdateRequest>,
) -> Result<Json<SelectionProcessRow>, AppError> {
    let next = Stage::parse(&req.stage)
        .ok_or_else(|| AppError::Validation(format!("unknown stage '{}'", req.stage)))?;

    let existing = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Process {id} not found")))?;

    let current = Stage::parse(&existing.stage).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "corrupt stage value '{}' on process {id}",
            existing.stage
        ))
    })?;
    if !current.can_transition_to(next) {
        return Err(AppError::Validation(format!(
            "process is already {} and cannot change stage",
            current.as_str()
        )));
    }

    let row = repo::set_stage(&state.db, id, next)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Process {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/processes/:id
pub async fn handle_delete_process(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Process {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
