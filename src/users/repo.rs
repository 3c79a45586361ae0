use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::USER_COLUMNS;
use crate::auth::repo_types::User;
use crate::users::dto::UpdateProfileRequest;

/// Apply a partial profile update. `COALESCE` keeps columns the request
/// leaves out, so one statement covers every subset of fields.
pub async fn update_profile(
    db: &PgPool,
    user_id: Uuid,
    req: &UpdateProfileRequest,
) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET
            full_name      = COALESCE($2, full_name),
            email          = COALESCE($3, email),
            gender         = COALESCE($4, gender),
            age            = COALESCE($5, age),
            weight         = COALESCE($6, weight),
            height         = COALESCE($7, height),
            goal           = COALESCE($8, goal),
            activity_level = COALESCE($9, activity_level),
            updated_at     = now()
         WHERE id = $1
         RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(req.full_name.as_deref())
    .bind(req.email.as_deref())
    .bind(req.gender)
    .bind(req.age)
    .bind(req.weight)
    .bind(req.height)
    .bind(req.goal.as_deref())
    .bind(req.activity_level.as_deref())
    .fetch_optional(db)
    .await?;
    Ok(user)
}
