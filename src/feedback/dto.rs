use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::feedback::repo_types::{Feedback, FeedbackKind, FeedbackStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub content: String,
    #[serde(default, rename = "type")]
    pub kind: FeedbackKind,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub status: FeedbackStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            content: f.content,
            kind: f.kind,
            status: f.status,
            created_at: f.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults_to_suggestion() {
        let req: SubmitFeedbackRequest =
            serde_json::from_str(r#"{"content":"add a barcode scanner"}"#).unwrap();
        assert_eq!(req.kind, FeedbackKind::Suggestion);
    }

    #[test]
    fn kind_arrives_under_the_type_key() {
        let req: SubmitFeedbackRequest =
            serde_json::from_str(r#"{"content":"crash on login","type":"bug"}"#).unwrap();
        assert_eq!(req.kind, FeedbackKind::Bug);
    }

    #[test]
    fn response_serializes_kind_as_type() {
        let resp = FeedbackResponse {
            id: Uuid::new_v4(),
            content: "crash on login".into(),
            kind: FeedbackKind::Bug,
            status: FeedbackStatus::Pending,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["type"], "bug");
        assert_eq!(json["status"], "pending");
    }
}
