use chrono::{DateTime, Utc};
use folio_models::contact::{ContactSubmission, StoredSubmission, SubmissionDraft, SubmissionId};
use serde::{Deserialize, Serialize};

/// Request body of `POST /api/contact`. Fields the caller left out
/// deserialize as empty and are reported through `missingFields` instead of
/// failing the parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl From<ApiContactMessage> for SubmissionDraft {
    fn from(value: ApiContactMessage) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}

/// The persisted record echoed back in the 201 body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubmissionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SubmissionId>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ApiSubmissionData {
    pub fn new(submission: &ContactSubmission, stored: StoredSubmission) -> Self {
        Self {
            id: stored.id,
            name: (*submission.name).clone(),
            email: (*submission.email).clone(),
            subject: (*submission.subject).clone(),
            message: (*submission.message).clone(),
            created_at: stored.created_at,
        }
    }
}
