use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{Gender, User};

/// Partial profile update. Absent fields are left untouched; password is
/// deliberately not updatable through this route.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<String>,
    pub activity_level: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<String>,
    pub activity_level: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            gender: user.gender,
            age: user.age,
            weight: user.weight,
            height: user.height,
            goal: user.goal,
            activity_level: user.activity_level,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_deserializes_missing_fields_as_none() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"age": 30, "activityLevel": "moderate"}"#).unwrap();
        assert_eq!(req.age, Some(30));
        assert_eq!(req.activity_level.as_deref(), Some("moderate"));
        assert!(req.full_name.is_none());
        assert!(req.weight.is_none());
    }

    #[test]
    fn gender_is_lowercase_on_the_wire() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"gender": "female"}"#).unwrap();
        assert_eq!(req.gender, Some(Gender::Female));
        assert!(serde_json::from_str::<UpdateProfileRequest>(r#"{"gender": "Unknown"}"#).is_err());
    }
}
