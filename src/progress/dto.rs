use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::meals::dto::MealResponse;
use crate::nutrition::MacroTotals;
use crate::progress::repo_types::Progress;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    #[serde(with = "crate::dates::day")]
    pub date: Date,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub meal_ids: Vec<Uuid>,
}

impl ProgressResponse {
    fn from_totals(date: Date, totals: MacroTotals, meal_ids: Vec<Uuid>) -> Self {
        Self {
            date,
            total_calories: totals.calories,
            total_protein: totals.protein,
            total_carbs: totals.carbs,
            total_fat: totals.fat,
            meal_ids,
        }
    }

    /// A day nobody has logged yet reads as all zeros, never as an error.
    /// Nothing is persisted for it.
    pub fn empty(date: Date) -> Self {
        Self::from_totals(date, MacroTotals::ZERO, Vec::new())
    }
}

impl From<Progress> for ProgressResponse {
    fn from(p: Progress) -> Self {
        Self::from_totals(p.date, p.totals(), p.meal_ids)
    }
}

/// Single-day view: the aggregate plus the meals behind it.
#[derive(Debug, Serialize)]
pub struct DayProgressResponse {
    #[serde(flatten)]
    pub summary: ProgressResponse,
    pub meals: Vec<MealResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn empty_day_serializes_zero_totals() {
        let resp = ProgressResponse::empty(date!(2024 - 01 - 01));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["totalCalories"], 0.0);
        assert_eq!(json["totalProtein"], 0.0);
        assert_eq!(json["totalCarbs"], 0.0);
        assert_eq!(json["totalFat"], 0.0);
        assert_eq!(json["mealIds"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn day_view_flattens_the_summary() {
        let resp = DayProgressResponse {
            summary: ProgressResponse::empty(date!(2024 - 01 - 01)),
            meals: Vec::new(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["meals"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn range_query_accepts_camel_case_params() {
        let q: RangeQuery =
            serde_json::from_str(r#"{"startDate":"2024-01-01","endDate":"2024-01-07"}"#).unwrap();
        assert_eq!(q.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(q.end_date.as_deref(), Some("2024-01-07"));
    }
}
