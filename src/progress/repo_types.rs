use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::MacroTotals;

/// Per-user-per-day nutrition totals, derived from the meal ledger.
/// `meal_ids` lists the meals summed into the row. Invariant: the totals
/// equal the sum of macros over all non-deleted meals for (user_id, date);
/// `recompute` re-establishes it from the ledger if drift is ever detected.
#[derive(Debug, Clone, FromRow)]
pub struct Progress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub meal_ids: Vec<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Progress {
    pub fn totals(&self) -> MacroTotals {
        MacroTotals::new(
            self.total_calories,
            self.total_protein,
            self.total_carbs,
            self.total_fat,
        )
    }
}
