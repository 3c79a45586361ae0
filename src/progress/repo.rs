use sqlx::{PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use crate::nutrition::MacroTotals;
use crate::progress::repo_types::Progress;

const PROGRESS_COLUMNS: &str = "id, user_id, date, total_calories, total_protein, total_carbs, \
                                total_fat, meal_ids, created_at, updated_at";

/// Fold a newly logged meal into its day's aggregate: lazily creates the
/// row on the first meal of a day, otherwise increments the four totals in
/// place and appends the meal reference. The increment happens inside the
/// database so concurrent creations for the same day cannot lose updates.
pub async fn add_meal_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: Date,
    macros: MacroTotals,
    meal_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO progress (user_id, date, total_calories, total_protein, total_carbs,
                               total_fat, meal_ids)
         VALUES ($1, $2, $3, $4, $5, $6, ARRAY[$7]::uuid[])
         ON CONFLICT (user_id, date) DO UPDATE SET
            total_calories = progress.total_calories + EXCLUDED.total_calories,
            total_protein  = progress.total_protein  + EXCLUDED.total_protein,
            total_carbs    = progress.total_carbs    + EXCLUDED.total_carbs,
            total_fat      = progress.total_fat      + EXCLUDED.total_fat,
            meal_ids       = array_append(progress.meal_ids, $7),
            updated_at     = now()",
    )
    .bind(user_id)
    .bind(day)
    .bind(macros.calories)
    .bind(macros.protein)
    .bind(macros.carbs)
    .bind(macros.fat)
    .bind(meal_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Apply a macro delta to a day's totals without touching the reference
/// set (the meal-update case). Upserts so a drifted-away row is recreated
/// rather than silently skipped.
pub async fn apply_delta_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: Date,
    delta: MacroTotals,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO progress (user_id, date, total_calories, total_protein, total_carbs,
                               total_fat)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (user_id, date) DO UPDATE SET
            total_calories = progress.total_calories + EXCLUDED.total_calories,
            total_protein  = progress.total_protein  + EXCLUDED.total_protein,
            total_carbs    = progress.total_carbs    + EXCLUDED.total_carbs,
            total_fat      = progress.total_fat      + EXCLUDED.total_fat,
            updated_at     = now()",
    )
    .bind(user_id)
    .bind(day)
    .bind(delta.calories)
    .bind(delta.protein)
    .bind(delta.carbs)
    .bind(delta.fat)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Subtract a deleted (or moved) meal's macros and drop its reference.
/// A missing row is a no-op, matching the delete of the last trace of a
/// day that was never aggregated.
pub async fn remove_meal_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: Date,
    macros: MacroTotals,
    meal_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE progress SET
            total_calories = total_calories - $3,
            total_protein  = total_protein  - $4,
            total_carbs    = total_carbs    - $5,
            total_fat      = total_fat      - $6,
            meal_ids       = array_remove(meal_ids, $7),
            updated_at     = now()
         WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(day)
    .bind(macros.calories)
    .bind(macros.protein)
    .bind(macros.carbs)
    .bind(macros.fat)
    .bind(meal_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn find_by_day(
    db: &PgPool,
    user_id: Uuid,
    day: Date,
) -> anyhow::Result<Option<Progress>> {
    let row = sqlx::query_as::<_, Progress>(&format!(
        "SELECT {PROGRESS_COLUMNS} FROM progress WHERE user_id = $1 AND date = $2"
    ))
    .bind(user_id)
    .bind(day)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Progress>> {
    let rows = sqlx::query_as::<_, Progress>(&format!(
        "SELECT {PROGRESS_COLUMNS} FROM progress WHERE user_id = $1 ORDER BY date DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Inclusive range, ascending, for weekly/range views.
pub async fn find_range(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<Progress>> {
    let rows = sqlx::query_as::<_, Progress>(&format!(
        "SELECT {PROGRESS_COLUMNS} FROM progress
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
         ORDER BY date ASC"
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Reconciliation: resum the day from the meal ledger and overwrite the
/// stored aggregate. The ledger is ground truth; this repairs any drift
/// the incremental deltas could have accumulated.
pub async fn recompute(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<Progress> {
    let row = sqlx::query_as::<_, Progress>(&format!(
        "INSERT INTO progress (user_id, date, total_calories, total_protein, total_carbs,
                               total_fat, meal_ids)
         SELECT $1, $2,
                COALESCE(SUM(calories), 0),
                COALESCE(SUM(protein), 0),
                COALESCE(SUM(carbs), 0),
                COALESCE(SUM(fat), 0),
                COALESCE(ARRAY_AGG(id ORDER BY created_at), ARRAY[]::uuid[])
         FROM meals
         WHERE user_id = $1 AND date = $2
         ON CONFLICT (user_id, date) DO UPDATE SET
            total_calories = EXCLUDED.total_calories,
            total_protein  = EXCLUDED.total_protein,
            total_carbs    = EXCLUDED.total_carbs,
            total_fat      = EXCLUDED.total_fat,
            meal_ids       = EXCLUDED.meal_ids,
            updated_at     = now()
         RETURNING {PROGRESS_COLUMNS}"
    ))
    .bind(user_id)
    .bind(day)
    .fetch_one(db)
    .await?;
    Ok(row)
}
