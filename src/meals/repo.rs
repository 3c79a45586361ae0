use sqlx::{PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use crate::meals::dto::NewMeal;
use crate::meals::repo_types::Meal;

const MEAL_COLUMNS: &str = "id, user_id, name, calories, protein, carbs, fat, date, meal_type, \
                            image, category, is_vegetarian, ingredients, instructions, created_at";

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals
         WHERE user_id = $1
         ORDER BY date DESC, created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_by_day(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals
         WHERE user_id = $1 AND date = $2
         ORDER BY created_at ASC"
    ))
    .bind(user_id)
    .bind(day)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Ownership-scoped lookup: an id belonging to another user behaves exactly
/// like an absent id.
pub async fn find_owned(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2"
    ))
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(meal)
}

/// Same lookup inside a mutation transaction, locking the row so two
/// concurrent mutations cannot both compute deltas against the same old
/// macro values.
pub async fn find_owned_for_update(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    meal_id: Uuid,
) -> anyhow::Result<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2 FOR UPDATE"
    ))
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(meal)
}

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    cmd: &NewMeal,
) -> anyhow::Result<Meal> {
    let meal = sqlx::query_as::<_, Meal>(&format!(
        "INSERT INTO meals (user_id, name, calories, protein, carbs, fat, date, meal_type,
                            image, category, is_vegetarian, ingredients, instructions)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
         RETURNING {MEAL_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&cmd.name)
    .bind(cmd.macros.calories)
    .bind(cmd.macros.protein)
    .bind(cmd.macros.carbs)
    .bind(cmd.macros.fat)
    .bind(cmd.date)
    .bind(cmd.meal_type)
    .bind(cmd.image.as_deref())
    .bind(cmd.category.as_deref())
    .bind(cmd.is_vegetarian)
    .bind(cmd.ingredients.as_deref())
    .bind(cmd.instructions.as_deref())
    .fetch_one(&mut **tx)
    .await?;
    Ok(meal)
}

pub async fn update_tx(tx: &mut Transaction<'_, Postgres>, meal: &Meal) -> anyhow::Result<Meal> {
    let meal = sqlx::query_as::<_, Meal>(&format!(
        "UPDATE meals SET
            name = $3, calories = $4, protein = $5, carbs = $6, fat = $7, date = $8,
            meal_type = $9, image = $10, category = $11, is_vegetarian = $12,
            ingredients = $13, instructions = $14, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {MEAL_COLUMNS}"
    ))
    .bind(meal.id)
    .bind(meal.user_id)
    .bind(&meal.name)
    .bind(meal.calories)
    .bind(meal.protein)
    .bind(meal.carbs)
    .bind(meal.fat)
    .bind(meal.date)
    .bind(meal.meal_type)
    .bind(meal.image.as_deref())
    .bind(meal.category.as_deref())
    .bind(meal.is_vegetarian)
    .bind(meal.ingredients.as_deref())
    .bind(meal.instructions.as_deref())
    .fetch_one(&mut **tx)
    .await?;
    Ok(meal)
}

pub async fn delete_tx(tx: &mut Transaction<'_, Postgres>, meal_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM meals WHERE id = $1")
        .bind(meal_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
