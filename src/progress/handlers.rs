use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::services::AuthUser,
    dates,
    error::ApiError,
    meals::{self, dto::MealResponse},
    progress::{
        dto::{DayProgressResponse, ProgressResponse, RangeQuery},
        repo,
    },
    state::AppState,
};

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/progress", get(list_progress))
        .route("/progress/date/:date", get(progress_by_date))
        .route("/progress/date/:date/recompute", post(recompute_progress))
        .route("/progress/range", get(progress_range))
}

#[instrument(skip(state))]
pub async fn list_progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ProgressResponse>>, ApiError> {
    let rows = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(ProgressResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn progress_by_date(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DayProgressResponse>, ApiError> {
    let day = dates::parse_day(&date)?;
    let summary = match repo::find_by_day(&state.db, user_id, day).await? {
        Some(row) => ProgressResponse::from(row),
        None => ProgressResponse::empty(day),
    };
    let meals = meals::repo::list_by_day(&state.db, user_id, day).await?;
    Ok(Json(DayProgressResponse {
        summary,
        meals: meals.into_iter().map(MealResponse::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn progress_range(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<ProgressResponse>>, ApiError> {
    let (start, end) = match (q.start_date, q.end_date) {
        (Some(s), Some(e)) => (dates::parse_day(&s)?, dates::parse_day(&e)?),
        _ => {
            return Err(ApiError::validation(
                "Start date and end date are required",
            ))
        }
    };
    let rows = repo::find_range(&state.db, user_id, start, end).await?;
    Ok(Json(rows.into_iter().map(ProgressResponse::from).collect()))
}

/// Repair endpoint: resums the day from the meal ledger, overwriting
/// whatever the incremental deltas had accumulated.
#[instrument(skip(state))]
pub async fn recompute_progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let day = dates::parse_day(&date)?;
    let row = repo::recompute(&state.db, user_id, day).await?;
    info!(user_id = %user_id, day = %day, "daily aggregate recomputed from ledger");
    Ok(Json(ProgressResponse::from(row)))
}
