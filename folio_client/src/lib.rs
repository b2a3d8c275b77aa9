//! The browser side of the contact form: local validation, one request in
//! flight at a time, field state preserved on failure.

use std::sync::LazyLock;

use folio_models::contact::{validate, FieldViolations, SubmissionDraft, SubmissionField};
use reqwest::header;
use serde::Deserialize;
use thiserror::Error;

/// Shown when the server's error message cannot be read.
pub const FALLBACK_ERROR: &str = "Failed to send message. Please try again later.";

pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let homepage = env!("CARGO_PKG_HOMEPAGE");
    let version = env!("CARGO_PKG_VERSION");

    format!("Folio Contact Form ({homepage}, Version {version})")
});

const _: () = {
    assert!(!env!("CARGO_PKG_HOMEPAGE").is_empty());
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::builder()
                .user_agent(&*USER_AGENT)
                .build()
                .unwrap(),
        }
    }

    /// `GET /api/test`: returns the server's banner message.
    pub async fn health(&self) -> Result<String, reqwest::Error> {
        #[derive(Deserialize)]
        struct TestResponse {
            message: String,
        }

        let response = self
            .http
            .get(format!("{}/api/test", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<TestResponse>().await?.message)
    }

    async fn send_contact(&self, draft: &SubmissionDraft) -> Result<String, SubmitError> {
        #[derive(Deserialize)]
        struct ContactResponse {
            message: Option<String>,
            error: Option<String>,
        }

        let response = self
            .http
            .post(format!("{}/api/contact", self.base_url))
            .header(header::ACCEPT, "application/json")
            .json(draft)
            .send()
            .await?;

        let status = response.status();
        let body = response.json::<ContactResponse>().await.ok();

        if status.is_success() {
            Ok(body
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Message sent successfully".into()))
        } else {
            Err(SubmitError::Server(
                body.and_then(|body| body.error)
                    .unwrap_or_else(|| FALLBACK_ERROR.into()),
            ))
        }
    }
}

#[derive(Debug, Error)]
enum SubmitError {
    #[error("{0}")]
    Server(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// One contact form instance. Drives the
/// `Idle -> Validating -> (Invalid | Submitting) -> (Succeeded | Failed)`
/// cycle of a submission attempt.
#[derive(Debug, Default)]
pub struct ContactForm {
    draft: SubmissionDraft,
    violations: FieldViolations,
    submitting: bool,
}

/// How a submission attempt resolved. The rendering layer maps this directly
/// to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent. Per-field messages are on
    /// the form.
    Invalid,
    /// The server accepted the submission; the fields were reset.
    Sent { message: String },
    /// The server rejected the submission or was unreachable; the fields are
    /// preserved so nothing has to be re-typed.
    Failed { error: String },
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: SubmissionField) -> &str {
        match field {
            SubmissionField::Name => &self.draft.name,
            SubmissionField::Email => &self.draft.email,
            SubmissionField::Subject => &self.draft.subject,
            SubmissionField::Message => &self.draft.message,
        }
    }

    /// Updates a field. A pending violation message on that field is cleared
    /// right away; the rules run again only on the next submit.
    pub fn set_field(&mut self, field: SubmissionField, value: impl Into<String>) {
        let slot = match field {
            SubmissionField::Name => &mut self.draft.name,
            SubmissionField::Email => &mut self.draft.email,
            SubmissionField::Subject => &mut self.draft.subject,
            SubmissionField::Message => &mut self.draft.message,
        };
        *slot = value.into();
        self.violations.0.remove(&field);
    }

    pub fn violation(&self, field: SubmissionField) -> Option<&'static str> {
        self.violations.get(field)
    }

    /// The submit control is disabled while this is true.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn submit(&mut self, client: &ApiClient) -> SubmitOutcome {
        if let Err(violations) = validate(&self.draft) {
            self.violations = violations;
            return SubmitOutcome::Invalid;
        }
        self.violations = FieldViolations::default();

        self.submitting = true;
        let result = client.send_contact(&self.draft).await;
        self.submitting = false;

        match result {
            Ok(message) => {
                self.draft = SubmissionDraft::default();
                SubmitOutcome::Sent { message }
            }
            Err(SubmitError::Server(error)) => SubmitOutcome::Failed { error },
            Err(SubmitError::Transport(_)) => SubmitOutcome::Failed {
                error: FALLBACK_ERROR.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_a_field_clears_its_violation() {
        let mut form = ContactForm::new();
        form.violations = validate(&form.draft).unwrap_err();
        assert!(form.violation(SubmissionField::Email).is_some());

        form.set_field(SubmissionField::Email, "ada@example.com");

        assert_eq!(form.violation(SubmissionField::Email), None);
        assert!(form.violation(SubmissionField::Name).is_some());
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:3001/");
        assert_eq!(client.base_url, "http://localhost:3001");
    }
}
