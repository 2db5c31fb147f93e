use sqlx::PgPool;
use uuid::Uuid;

use crate::models::process::{SelectionProcessRow, Stage};

pub async fn insert(
    pool: &PgPool,
    candidate_id: Uuid,
    position: &str,
    notes: Option<&str>,
) -> Result<SelectionProcessRow, sqlx::Error> {
    sqlx::query_as::<_, SelectionProcessRow>(
        r#"
        INSERT INTO selection_processes (id, candidate_id, position, stage, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(candidate_id)
    .bind(position)
    .bind(Stage::Received.as_str())
    .bind(notes)
    .fetch_one(pool)
    .await
}

pub async fn list(
    pool: &PgPool,
    candidate_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<SelectionProcessRow>, sqlx::Error> {
    match candidate_id {
        Some(candidate_id) => {
            sqlx::query_as::<_, SelectionProcessRow>(
                r#"
                SELECT * FROM selection_processes
                WHERE candidate_id = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(candidate_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, SelectionProcessRow>(
                "SELECT * FROM selection_processes ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<SelectionProcessRow>, sqlx::Error> {
    sqlx::query_as::<_, SelectionProcessRow>("SELECT * FROM selection_processes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn set_stage(
    pool: &PgPool,
    id: Uuid,
    stage: Stage,
) -> Result<Option<SelectionProcessRow>, sqlx::Error> {
    sqlx::query_as::<_, SelectionProcessRow>(
        r#"
        UPDATE selection_processes
        SET stage = $2, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(stage.as_str())
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM selection_processes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
