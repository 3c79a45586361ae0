use anyhow::Context;
use time::Date;
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::meals::dto::{MealUpdate, NewMeal};
use crate::meals::repo;
use crate::meals::repo_types::Meal;
use crate::progress;
use crate::state::AppState;

/// Persist a meal and fold its macros into the day's aggregate. The two
/// writes share one transaction: if the aggregate step fails the meal
/// insert is rolled back, so the aggregate can never silently under-count.
pub async fn create_meal(
    state: &AppState,
    user_id: Uuid,
    cmd: NewMeal,
) -> Result<Meal, ApiError> {
    let mut tx = state.db.begin().await.context("begin tx")?;

    let meal = repo::insert_tx(&mut tx, user_id, &cmd).await?;
    progress::repo::add_meal_tx(&mut tx, user_id, meal.date, meal.macros(), meal.id)
        .await
        .map_err(|e| aggregate_failure(user_id, meal.date, e))?;

    tx.commit().await.context("commit tx")?;
    Ok(meal)
}

/// Update a meal and keep its day's aggregate exact by applying the macro
/// delta (`new - old`) rather than recomputing. A date change moves both
/// the macros and the meal reference between the two days' aggregates.
pub async fn update_meal(
    state: &AppState,
    user_id: Uuid,
    meal_id: Uuid,
    update: MealUpdate,
) -> Result<Meal, ApiError> {
    let mut tx = state.db.begin().await.context("begin tx")?;

    let old = repo::find_owned_for_update(&mut tx, user_id, meal_id)
        .await?
        .ok_or(ApiError::NotFound("Meal"))?;
    let updated = repo::update_tx(&mut tx, &old.clone().apply(update)).await?;

    if updated.date == old.date {
        let delta = updated.macros() - old.macros();
        progress::repo::apply_delta_tx(&mut tx, user_id, old.date, delta)
            .await
            .map_err(|e| aggregate_failure(user_id, old.date, e))?;
    } else {
        progress::repo::remove_meal_tx(&mut tx, user_id, old.date, old.macros(), old.id)
            .await
            .map_err(|e| aggregate_failure(user_id, old.date, e))?;
        progress::repo::add_meal_tx(&mut tx, user_id, updated.date, updated.macros(), updated.id)
            .await
            .map_err(|e| aggregate_failure(user_id, updated.date, e))?;
    }

    tx.commit().await.context("commit tx")?;
    Ok(updated)
}

/// Delete a meal, subtracting its macros and dropping its reference from
/// the day's aggregate in the same transaction.
pub async fn delete_meal(state: &AppState, user_id: Uuid, meal_id: Uuid) -> Result<(), ApiError> {
    let mut tx = state.db.begin().await.context("begin tx")?;

    let meal = repo::find_owned_for_update(&mut tx, user_id, meal_id)
        .await?
        .ok_or(ApiError::NotFound("Meal"))?;
    progress::repo::remove_meal_tx(&mut tx, user_id, meal.date, meal.macros(), meal.id)
        .await
        .map_err(|e| aggregate_failure(user_id, meal.date, e))?;
    repo::delete_tx(&mut tx, meal.id).await?;

    tx.commit().await.context("commit tx")?;
    Ok(())
}

/// Aggregate-maintenance failures get their own log event so drift attempts
/// are distinguishable from generic 500s, even though the rollback keeps
/// the ledger and aggregate consistent.
fn aggregate_failure(user_id: Uuid, day: Date, e: anyhow::Error) -> ApiError {
    error!(
        user_id = %user_id,
        day = %day,
        error = %e,
        "daily aggregate update failed; rolling back meal mutation"
    );
    ApiError::Internal(e)
}
