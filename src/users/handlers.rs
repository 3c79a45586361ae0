use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        repo_types::User,
        services::{is_valid_email, AuthUser},
    },
    error::{is_unique_violation, ApiError},
    state::AppState,
    users::{
        dto::{ProfileResponse, UpdateProfileRequest},
        repo,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(ProfileResponse::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email in profile update");
            return Err(ApiError::validation("Invalid email"));
        }
    }
    if let Some(name) = &payload.full_name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Full name cannot be empty"));
        }
    }
    for (field, value) in [
        ("age", payload.age.map(f64::from)),
        ("weight", payload.weight),
        ("height", payload.height),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(ApiError::Validation(format!(
                    "{field} must be a non-negative number"
                )));
            }
        }
    }

    let user = match repo::update_profile(&state.db, user_id, &payload).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict("Email already registered".into()))
        }
        Err(e) => return Err(e.into()),
    }
    .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(ProfileResponse::from(user)))
}
