use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::MacroTotals;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// One logged food entry. The ledger is ground truth; the per-day progress
/// row is derived from it. `date` is day-granular by construction, so a
/// meal belongs to exactly one aggregate day.
#[derive(Debug, Clone, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: Date,
    pub meal_type: MealType,
    pub image: Option<String>,
    pub category: Option<String>,
    pub is_vegetarian: bool,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Meal {
    pub fn macros(&self) -> MacroTotals {
        MacroTotals::new(self.calories, self.protein, self.carbs, self.fat)
    }
}
