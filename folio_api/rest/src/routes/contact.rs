use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactService, ContactSubmitError};
use folio_models::contact::{validate, MissingFields, SubmissionDraft, SubmissionField};

use super::failure;
use crate::models::{
    contact::{ApiContactMessage, ApiSubmissionData},
    ApiFailure, ApiSuccess,
};

pub fn router(service: Arc<impl ContactService>, verbose_errors: bool) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(ContactState {
            service,
            verbose_errors,
        })
}

#[derive(Debug)]
struct ContactState<Contact> {
    service: Arc<Contact>,
    verbose_errors: bool,
}

impl<Contact> Clone for ContactState<Contact> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            verbose_errors: self.verbose_errors,
        }
    }
}

async fn send_message(
    state: State<ContactState<impl ContactService>>,
    payload: Result<Json<ApiContactMessage>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(message)) => message,
        Err(JsonRejection::MissingJsonContentType(_)) => {
            return failure(
                StatusCode::BAD_REQUEST,
                ApiFailure::new("Content-Type must be application/json"),
            );
        }
        Err(rejection) => {
            return failure(StatusCode::BAD_REQUEST, ApiFailure::new(rejection.body_text()));
        }
    };

    let draft = SubmissionDraft::from(message);

    // Blank fields are reported before any format validation runs.
    let missing = MissingFields::of(&draft);
    if missing.any() {
        return failure(
            StatusCode::BAD_REQUEST,
            ApiFailure::new("All fields are required").with_missing_fields(missing),
        );
    }

    // The client has already validated, but this check is the trust boundary.
    let submission = match validate(&draft) {
        Ok(submission) => submission,
        Err(violations) => {
            // A broken email address gets its own message, ahead of the
            // remaining rule violations.
            let body = match violations.get(SubmissionField::Email) {
                Some(message) => ApiFailure::new(message),
                None => ApiFailure::new("Validation failed").with_field_errors(violations),
            };
            return failure(StatusCode::BAD_REQUEST, body);
        }
    };

    match state.service.submit_message(submission.clone()).await {
        Ok(stored) => (
            StatusCode::CREATED,
            Json(ApiSuccess::new(
                "Message sent successfully",
                ApiSubmissionData::new(&submission, stored),
            )),
        )
            .into_response(),
        Err(err) => submit_error(err, state.verbose_errors),
    }
}

fn submit_error(err: ContactSubmitError, verbose_errors: bool) -> Response {
    let err = anyhow::Error::new(err);
    tracing::error!("failed to store contact submission: {err:#}");
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiFailure::new("Failed to save message")
            .with_details(err.to_string())
            .with_stack(verbose_errors.then(|| format!("{err:?}"))),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use chrono::{TimeZone, Utc};
    use folio_core_contact_contracts::MockContactService;
    use folio_models::contact::{ContactSubmission, StoredSubmission, SubmissionId};
    use folio_persistence_contracts::StoreError;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    fn submission() -> ContactSubmission {
        validate(&SubmissionDraft {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: "Hi".into(),
            message: "Hello there, testing.".into(),
        })
        .unwrap()
    }

    fn stored() -> StoredSubmission {
        StoredSubmission {
            id: Some(SubmissionId::Serial(1)),
            created_at: Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap(),
        }
    }

    async fn post(
        service: MockContactService,
        verbose_errors: bool,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = axum::http::Request::post("/api/contact")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router(Arc::new(service), verbose_errors)
            .oneshot(request)
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn valid_body() -> serde_json::Value {
        json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Hi",
            "message": "Hello there, testing.",
        })
    }

    #[tokio::test]
    async fn created() {
        let service = MockContactService::new().with_submit_message(submission(), Ok(stored()));

        let (status, body) = post(service, false, valid_body()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Message sent successfully",
                "data": {
                    "id": 1,
                    "name": "Ada",
                    "email": "ada@example.com",
                    "subject": "Hi",
                    "message": "Hello there, testing.",
                    "createdAt": "2025-04-01T12:00:00Z",
                },
            })
        );
    }

    #[tokio::test]
    async fn wrong_content_type() {
        let request = axum::http::Request::post("/api/contact")
            .header("Content-Type", "text/plain")
            .body(Body::from(valid_body().to_string()))
            .unwrap();
        let response = router(Arc::new(MockContactService::new()), false)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Content-Type must be application/json"));
    }

    #[tokio::test]
    async fn missing_fields_are_flagged() {
        let (status, body) = post(
            MockContactService::new(),
            false,
            json!({"name": "Ada", "message": "Hello there, testing."}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "All fields are required",
                "missingFields": {
                    "name": false,
                    "email": true,
                    "subject": true,
                    "message": false,
                },
            })
        );
    }

    #[tokio::test]
    async fn invalid_email() {
        for email in ["not-an-email", "a@b"] {
            let mut body = valid_body();
            body["email"] = json!(email);

            let (status, body) = post(MockContactService::new(), false, body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], json!("Please enter a valid email address"));
            assert_eq!(body.get("fieldErrors"), None);
        }
    }

    #[tokio::test]
    async fn rule_violations_are_mapped_per_field() {
        let mut request_body = valid_body();
        request_body["message"] = json!("short");

        let (status, body) = post(MockContactService::new(), false, request_body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Validation failed"));
        assert_eq!(
            body["fieldErrors"],
            json!({"message": "Message must be at least 10 characters"})
        );
    }

    #[tokio::test]
    async fn store_failure_is_sanitized_in_production() {
        let service = MockContactService::new()
            .with_submit_message(submission(), Err(StoreError::Unavailable.into()));

        let (status, body) = post(service, false, valid_body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Failed to save message"));
        assert_eq!(
            body["details"],
            json!("contact message store is unavailable")
        );
        assert_eq!(body.get("stack"), None);
    }

    #[tokio::test]
    async fn store_failure_includes_stack_in_development() {
        let service = MockContactService::new()
            .with_submit_message(submission(), Err(StoreError::Unavailable.into()));

        let (status, body) = post(service, true, valid_body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["stack"].is_string());
    }
}
