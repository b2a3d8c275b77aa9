use folio_models::contact::{FieldViolations, MissingFields};
use serde::Serialize;

pub mod contact;

/// Envelope of every 2xx response.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

/// Envelope of every 4xx/5xx response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub success: bool,
    pub error: String,
    /// Blank-field flags of the "All fields are required" rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<MissingFields>,
    /// Field name -> violation message of a failed rule-set check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldViolations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Error chain, development mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ApiFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            missing_fields: None,
            field_errors: None,
            details: None,
            stack: None,
        }
    }

    pub fn with_missing_fields(mut self, missing_fields: MissingFields) -> Self {
        self.missing_fields = Some(missing_fields);
        self
    }

    pub fn with_field_errors(mut self, field_errors: FieldViolations) -> Self {
        self.field_errors = Some(field_errors);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }
}
