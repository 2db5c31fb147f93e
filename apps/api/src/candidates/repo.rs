//! Candidate queries. PII columns arrive here already encrypted; this
//! layer never sees plaintext email/phone/address values.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::candidate::CandidateRow;
use crate::upload::UploadedFile;

pub struct NewCandidate<'a> {
    pub full_name: &'a str,
    pub email_enc: String,
    pub phone_enc: String,
    pub address_enc: Option<String>,
    pub cv: &'a UploadedFile,
}

pub struct ProfileUpdate {
    pub full_name: String,
    pub email_enc: String,
    pub phone_enc: String,
    pub address_enc: Option<String>,
}

pub async fn insert(pool: &PgPool, new: NewCandidate<'_>) -> Result<CandidateRow, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        INSERT INTO candidates
            (id, full_name, email, phone, address,
             cv_original_name, cv_stored_name, cv_url, cv_mime_type, cv_size_bytes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.full_name)
    .bind(&new.email_enc)
    .bind(&new.phone_enc)
    .bind(&new.address_enc)
    .bind(&new.cv.original_name)
    .bind(&new.cv.stored_name)
    .bind(&new.cv.url)
    .bind(&new.cv.mime_type)
    .bind(new.cv.size_bytes)
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        "SELECT * FROM candidates ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    update: ProfileUpdate,
) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates
        SET full_name = $2, email = $3, phone = $4, address = $5, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&update.full_name)
    .bind(&update.email_enc)
    .bind(&update.phone_enc)
    .bind(&update.address_enc)
    .fetch_optional(pool)
    .await
}

pub async fn update_cv(
    pool: &PgPool,
    id: Uuid,
    cv: &UploadedFile,
) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates
        SET cv_original_name = $2, cv_stored_name = $3, cv_url = $4,
            cv_mime_type = $5, cv_size_bytes = $6, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&cv.original_name)
    .bind(&cv.stored_name)
    .bind(&cv.url)
    .bind(&cv.mime_type)
    .bind(cv.size_bytes)
    .fetch_optional(pool)
    .await
}

/// Delete a candidate row, returning it so the caller can clean up the
/// stored CV file afterwards. Selection processes cascade in the schema.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>("DELETE FROM candidates WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
