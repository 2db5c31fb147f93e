use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::candidates::repo::{self, NewCandidate, ProfileUpdate};
use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::state::AppState;
use crate::upload::store_cv;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateCandidateRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
}

/// The file part of a multipart submission, as declared by the client.
struct CvPart {
    original_name: String,
    mime_type: String,
    bytes: Bytes,
}

/// Drain a multipart body into text fields plus at most one CV part.
/// The file may arrive under either `cv` or `resume`; unknown fields are
/// ignored.
async fn collect_multipart(
    multipart: &mut Multipart,
) -> Result<(HashMap<String, String>, Option<CvPart>), AppError> {
    let mut fields = HashMap::new();
    let mut cv = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart request: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv" | "resume" => {
                let original_name = field
                    .file_name()
                    .ok_or_else(|| {
                        AppError::Validation("CV field is missing a filename".to_string())
                    })?
                    .to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("failed to read uploaded file: {e}"))
                })?;
                cv = Some(CvPart {
                    original_name,
                    mime_type,
                    bytes,
                });
            }
            "" => {}
            _ => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("invalid field '{name}': {e}"))
                })?;
                fields.insert(name, value);
            }
        }
    }

    Ok((fields, cv))
}

fn required(fields: &mut HashMap<String, String>, key: &str) -> Result<String, AppError> {
    fields
        .remove(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{key} is required")))
}

/// POST /api/v1/candidates
///
/// Multipart form: `full_name`, `email`, `phone`, optional `address`, and
/// the CV file. The file is validated and stored first; if the row insert
/// then fails, the stored file is deleted so no orphan is left behind.
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let (mut fields, cv) = collect_multipart(&mut multipart).await?;

    let full_name = required(&mut fields, "full_name")?;
    let email = required(&mut fields, "email")?;
    let phone = required(&mut fields, "phone")?;
    let address = fields.remove("address").filter(|v| !v.trim().is_empty());

    let cv = cv.ok_or_else(|| AppError::Validation("a CV file is required".to_string()))?;
    let uploaded = store_cv(
        state.store.as_ref(),
        &cv.original_name,
        &cv.mime_type,
        &cv.bytes,
    )
    .await?;

    let new = NewCandidate {
        full_name: &full_name,
        email_enc: state.cipher.encrypt(&email).to_string(),
        phone_enc: state.cipher.encrypt(&phone).to_string(),
        address_enc: address.map(|a| state.cipher.encrypt(&a).to_string()),
        cv: &uploaded,
    };

    // Compensating delete: the file write and the row insert are not
    // atomic, so a failed insert must take the stored file with it.
    let row = match repo::insert(&state.db, new).await {
        Ok(row) => row,
        Err(e) => {
            if let Err(cleanup) = state.store.delete(&uploaded.stored_name).await {
                warn!(
                    "failed to clean up {} after insert error: {cleanup}",
                    uploaded.stored_name
                );
            }
            return Err(e.into());
        }
    };

    Ok((StatusCode::CREATED, Json(row.into_api(&state.cipher)?)))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let rows = repo::list(&state.db, limit, offset).await?;
    let candidates = rows
        .into_iter()
        .map(|row| row.into_api(&state.cipher))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(candidates))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let row = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(row.into_api(&state.cipher)?))
}

/// PUT /api/v1/candidates/:id
///
/// Profile update. PII columns are replaced wholesale with freshly
/// encrypted values; there is no partial re-encryption.
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCandidateRequest>,
) -> Result<Json<Candidate>, AppError> {
    if req.full_name.trim().is_empty() {
        return Err(AppError::Validation("full_name is required".to_string()));
    }
    if req.email.trim().is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }
    if req.phone.trim().is_empty() {
        return Err(AppError::Validation("phone is required".to_string()));
    }

    let update = ProfileUpdate {
        full_name: req.full_name,
        email_enc: state.cipher.encrypt(&req.email).to_string(),
        phone_enc: state.cipher.encrypt(&req.phone).to_string(),
        address_enc: req.address.map(|a| state.cipher.encrypt(&a).to_string()),
    };

    let row = repo::update_profile(&state.db, id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(row.into_api(&state.cipher)?))
}

/// PUT /api/v1/candidates/:id/cv
///
/// CV replacement: the new file runs the full pipeline first, the row is
/// switched over, and only then is the old file deleted. A failed row
/// update cleans up the new file instead.
pub async fn handle_replace_cv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Candidate>, AppError> {
    let existing = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    let (_, cv) = collect_multipart(&mut multipart).await?;
    let cv = cv.ok_or_else(|| AppError::Validation("a CV file is required".to_string()))?;

    let uploaded = store_cv(
        state.store.as_ref(),
        &cv.original_name,
        &cv.mime_type,
        &cv.bytes,
    )
    .await?;

    let row = match repo::update_cv(&state.db, id, &uploaded).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            // Candidate vanished between the lookup and the update.
            if let Err(cleanup) = state.store.delete(&uploaded.stored_name).await {
                warn!(
                    "failed to clean up {} after missing row: {cleanup}",
                    uploaded.stored_name
                );
            }
            return Err(AppError::NotFound(format!("Candidate {id} not found")));
        }
        Err(e) => {
            if let Err(cleanup) = state.store.delete(&uploaded.stored_name).await {
                warn!(
                    "failed to clean up {} after update error: {cleanup}",
                    uploaded.stored_name
                );
            }
            return Err(e.into());
        }
    };

    if let Err(e) = state.store.delete(&existing.cv_stored_name).await {
        warn!(
            "failed to delete replaced CV {}: {e}",
            existing.cv_stored_name
        );
    }

    Ok(Json(row.into_api(&state.cipher)?))
}

/// DELETE /api/v1/candidates/:id
///
/// The row goes first (processes cascade with it), then the CV file.
/// Deleting a file that is already gone is a no-op.
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let row = repo::delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    state.store.delete(&row.cv_stored_name).await?;

    Ok(StatusCode::NO_CONTENT)
}
