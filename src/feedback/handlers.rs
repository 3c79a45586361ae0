use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    error::ApiError,
    feedback::{
        dto::{FeedbackResponse, SubmitFeedbackRequest},
        repo,
    },
    state::AppState,
};

const MAX_CONTENT_CHARS: usize = 1000;

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", get(list_feedback).post(submit_feedback))
        .route("/feedback/:id", axum::routing::delete(delete_feedback))
}

#[instrument(skip(state, payload))]
pub async fn submit_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::validation("Feedback content is required"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ApiError::Validation(format!(
            "Feedback content must be at most {MAX_CONTENT_CHARS} characters"
        )));
    }

    let feedback = repo::insert(&state.db, user_id, content, payload.kind).await?;
    info!(user_id = %user_id, feedback_id = %feedback.id, kind = ?feedback.kind, "feedback submitted");
    Ok((StatusCode::CREATED, Json(FeedbackResponse::from(feedback))))
}

#[instrument(skip(state))]
pub async fn list_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<FeedbackResponse>>, ApiError> {
    let rows = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(FeedbackResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn delete_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !repo::delete_owned(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Feedback"));
    }
    info!(user_id = %user_id, feedback_id = %id, "feedback deleted");
    Ok(Json(json!({ "message": "Feedback deleted successfully" })))
}
