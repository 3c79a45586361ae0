use sqlx::PgPool;
use uuid::Uuid;

use crate::feedback::repo_types::{Feedback, FeedbackKind};

const FEEDBACK_COLUMNS: &str = "id, user_id, content, kind, status, created_at";

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    content: &str,
    kind: FeedbackKind,
) -> anyhow::Result<Feedback> {
    let row = sqlx::query_as::<_, Feedback>(&format!(
        "INSERT INTO feedback (user_id, content, kind)
         VALUES ($1, $2, $3)
         RETURNING {FEEDBACK_COLUMNS}"
    ))
    .bind(user_id)
    .bind(content)
    .bind(kind)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Feedback>> {
    let rows = sqlx::query_as::<_, Feedback>(&format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback
         WHERE user_id = $1
         ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Owner-scoped delete; returns whether a row was removed. Not-owned ids
/// look identical to absent ones.
pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM feedback WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
