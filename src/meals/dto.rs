use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates;
use crate::error::ApiError;
use crate::meals::repo_types::{Meal, MealType};
use crate::nutrition::MacroTotals;

/// Request body for logging a meal. Dates arrive as `YYYY-MM-DD` strings;
/// validation happens in [`CreateMealRequest::into_command`] so malformed
/// input never reaches the repo layer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: String,
    pub meal_type: Option<MealType>,
    pub image: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
}

/// Validated create command handed to the service layer.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub macros: MacroTotals,
    pub date: Date,
    pub meal_type: MealType,
    pub image: Option<String>,
    pub category: Option<String>,
    pub is_vegetarian: bool,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
}

impl CreateMealRequest {
    pub fn into_command(self) -> Result<NewMeal, ApiError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::validation("Name is required"));
        }
        let macros = MacroTotals::new(self.calories, self.protein, self.carbs, self.fat);
        macros
            .validate()
            .map_err(|field| ApiError::Validation(format!("{field} must be a non-negative number")))?;
        let date = dates::parse_day(&self.date)?;
        Ok(NewMeal {
            name,
            macros,
            date,
            meal_type: self.meal_type.unwrap_or(MealType::Snack),
            image: self.image,
            category: self.category,
            is_vegetarian: self.is_vegetarian,
            ingredients: self.ingredients,
            instructions: self.instructions,
        })
    }
}

/// Partial meal update; absent fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub date: Option<String>,
    pub meal_type: Option<MealType>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
}

/// Validated update command.
#[derive(Debug, Clone, Default)]
pub struct MealUpdate {
    pub name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub date: Option<Date>,
    pub meal_type: Option<MealType>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
}

impl UpdateMealRequest {
    pub fn into_command(self) -> Result<MealUpdate, ApiError> {
        let name = match self.name {
            Some(n) => {
                let n = n.trim().to_string();
                if n.is_empty() {
                    return Err(ApiError::validation("Name cannot be empty"));
                }
                Some(n)
            }
            None => None,
        };
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ApiError::Validation(format!(
                        "{field} must be a non-negative number"
                    )));
                }
            }
        }
        let date = match self.date {
            Some(s) => Some(dates::parse_day(&s)?),
            None => None,
        };
        Ok(MealUpdate {
            name,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            date,
            meal_type: self.meal_type,
            image: self.image,
            category: self.category,
            is_vegetarian: self.is_vegetarian,
            ingredients: self.ingredients,
            instructions: self.instructions,
        })
    }
}

impl Meal {
    /// Merge an update into an existing row. Pure, so the delta logic in the
    /// service layer can be exercised without a database.
    pub fn apply(mut self, update: MealUpdate) -> Meal {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(v) = update.calories {
            self.calories = v;
        }
        if let Some(v) = update.protein {
            self.protein = v;
        }
        if let Some(v) = update.carbs {
            self.carbs = v;
        }
        if let Some(v) = update.fat {
            self.fat = v;
        }
        if let Some(d) = update.date {
            self.date = d;
        }
        if let Some(t) = update.meal_type {
            self.meal_type = t;
        }
        if let Some(v) = update.image {
            self.image = Some(v);
        }
        if let Some(v) = update.category {
            self.category = Some(v);
        }
        if let Some(v) = update.is_vegetarian {
            self.is_vegetarian = v;
        }
        if let Some(v) = update.ingredients {
            self.ingredients = Some(v);
        }
        if let Some(v) = update.instructions {
            self.instructions = Some(v);
        }
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(with = "crate::dates::day")]
    pub date: Date,
    pub meal_type: MealType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub is_vegetarian: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Meal> for MealResponse {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            name: m.name,
            calories: m.calories,
            protein: m.protein,
            carbs: m.carbs,
            fat: m.fat,
            date: m.date,
            meal_type: m.meal_type,
            image: m.image,
            category: m.category,
            is_vegetarian: m.is_vegetarian,
            ingredients: m.ingredients,
            instructions: m.instructions,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn create_request(json: &str) -> CreateMealRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn create_command_happy_path() {
        let req = create_request(
            r#"{"name":"Oatmeal","calories":300,"protein":10,"carbs":50,"fat":5,
                "date":"2024-01-01","mealType":"breakfast"}"#,
        );
        let cmd = req.into_command().unwrap();
        assert_eq!(cmd.name, "Oatmeal");
        assert_eq!(cmd.macros, MacroTotals::new(300.0, 10.0, 50.0, 5.0));
        assert_eq!(cmd.date, date!(2024 - 01 - 01));
        assert_eq!(cmd.meal_type, MealType::Breakfast);
    }

    #[test]
    fn create_defaults_meal_type_to_snack() {
        let req = create_request(
            r#"{"name":"Apple","calories":52,"protein":0.3,"carbs":14,"fat":0.2,"date":"2024-01-01"}"#,
        );
        assert_eq!(req.into_command().unwrap().meal_type, MealType::Snack);
    }

    #[test]
    fn create_rejects_negative_macros() {
        let req = create_request(
            r#"{"name":"Bad","calories":-10,"protein":1,"carbs":1,"fat":1,"date":"2024-01-01"}"#,
        );
        let err = req.into_command().unwrap_err();
        assert!(err.to_string().contains("calories"));
    }

    #[test]
    fn create_rejects_blank_name_and_bad_date() {
        let req = create_request(
            r#"{"name":"  ","calories":1,"protein":1,"carbs":1,"fat":1,"date":"2024-01-01"}"#,
        );
        assert!(req.into_command().is_err());

        let req = create_request(
            r#"{"name":"Toast","calories":1,"protein":1,"carbs":1,"fat":1,"date":"01/02/2024"}"#,
        );
        assert!(req.into_command().is_err());
    }

    #[test]
    fn update_command_parses_subset() {
        let req: UpdateMealRequest =
            serde_json::from_str(r#"{"mealType":"lunch","calories":250}"#).unwrap();
        let cmd = req.into_command().unwrap();
        assert_eq!(cmd.meal_type, Some(MealType::Lunch));
        assert_eq!(cmd.calories, Some(250.0));
        assert!(cmd.date.is_none());
    }

    #[test]
    fn update_rejects_negative_macro() {
        let req: UpdateMealRequest = serde_json::from_str(r#"{"fat":-0.1}"#).unwrap();
        assert!(req.into_command().is_err());
    }

    fn sample_meal() -> Meal {
        Meal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Oatmeal".into(),
            calories: 300.0,
            protein: 10.0,
            carbs: 50.0,
            fat: 5.0,
            date: date!(2024 - 01 - 01),
            meal_type: MealType::Breakfast,
            image: None,
            category: None,
            is_vegetarian: false,
            ingredients: None,
            instructions: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn apply_overrides_only_provided_fields() {
        let meal = sample_meal();
        let updated = meal.clone().apply(MealUpdate {
            calories: Some(350.0),
            meal_type: Some(MealType::Dinner),
            ..Default::default()
        });
        assert_eq!(updated.calories, 350.0);
        assert_eq!(updated.meal_type, MealType::Dinner);
        assert_eq!(updated.protein, meal.protein);
        assert_eq!(updated.date, meal.date);
        assert_eq!(updated.id, meal.id);
    }

    #[test]
    fn apply_then_macros_gives_exact_delta() {
        let old = sample_meal();
        let updated = old.clone().apply(MealUpdate {
            calories: Some(200.0),
            protein: Some(5.0),
            carbs: Some(20.0),
            fat: Some(8.0),
            ..Default::default()
        });
        let delta = updated.macros() - old.macros();
        assert_eq!(delta, MacroTotals::new(-100.0, -5.0, -30.0, 3.0));
    }

    #[test]
    fn response_uses_camel_case_and_day_format() {
        let resp = MealResponse::from(sample_meal());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["mealType"], "breakfast");
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["isVegetarian"], false);
        assert!(json.get("image").is_none());
    }
}
