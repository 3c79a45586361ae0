use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    dates,
    error::ApiError,
    meals::{
        dto::{CreateMealRequest, MealResponse, UpdateMealRequest},
        repo, services,
    },
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/by-date", get(list_meals_by_date))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MealResponse>>, ApiError> {
    let meals = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct ByDateQuery {
    pub date: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_meals_by_date(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ByDateQuery>,
) -> Result<Json<Vec<MealResponse>>, ApiError> {
    let date = q
        .date
        .ok_or_else(|| ApiError::validation("Date parameter is required"))?;
    let day = dates::parse_day(&date)?;
    let meals = repo::list_by_day(&state.db, user_id, day).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealResponse>, ApiError> {
    let meal = repo::find_owned(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Meal"))?;
    Ok(Json(MealResponse::from(meal)))
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealResponse>), ApiError> {
    let cmd = payload.into_command()?;
    let meal = services::create_meal(&state, user_id, cmd).await?;
    info!(user_id = %user_id, meal_id = %meal.id, day = %meal.date, "meal logged");
    Ok((StatusCode::CREATED, Json(MealResponse::from(meal))))
}

#[instrument(skip(state, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMealRequest>,
) -> Result<Json<MealResponse>, ApiError> {
    let update = payload.into_command()?;
    let meal = services::update_meal(&state, user_id, id, update).await?;
    info!(user_id = %user_id, meal_id = %meal.id, "meal updated");
    Ok(Json(MealResponse::from(meal)))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    services::delete_meal(&state, user_id, id).await?;
    info!(user_id = %user_id, meal_id = %id, "meal deleted");
    Ok(Json(json!({ "message": "Meal deleted successfully" })))
}
