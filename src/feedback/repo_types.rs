use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "feedback_kind", rename_all = "lowercase")]
pub enum FeedbackKind {
    #[default]
    Suggestion,
    Question,
    Bug,
    Feature,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "feedback_status", rename_all = "lowercase")]
pub enum FeedbackStatus {
    Pending,
    Reviewed,
    Implemented,
    Declined,
}

#[derive(Debug, Clone, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub kind: FeedbackKind,
    pub status: FeedbackStatus,
    pub created_at: OffsetDateTime,
}
