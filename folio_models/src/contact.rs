use std::{collections::BTreeMap, sync::LazyLock};

use chrono::{DateTime, Utc};
use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `local@domain.tld`: exactly one `@`, at least one `.` after it, no
/// whitespace anywhere.
pub static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[nutype(
    validate(len_char_min = 2, len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionName(String);

#[nutype(
    validate(len_char_max = 256, regex = EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionEmail(String);

#[nutype(
    validate(len_char_min = 3, len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionSubject(String);

#[nutype(
    validate(len_char_min = 10, len_char_max = 4096),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionMessage(String);

/// A fully validated contact form submission. Values of this type cannot
/// carry an invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: SubmissionName,
    pub email: SubmissionEmail,
    pub subject: SubmissionSubject,
    pub message: SubmissionMessage,
}

/// The raw, possibly partially filled form state as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionField {
    Name,
    Email,
    Subject,
    Message,
}

impl SubmissionField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];
}

/// Field name -> human readable violation message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldViolations(pub BTreeMap<SubmissionField, &'static str>);

impl FieldViolations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: SubmissionField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }
}

/// Blank-field flags, reported before any format validation runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissingFields {
    pub name: bool,
    pub email: bool,
    pub subject: bool,
    pub message: bool,
}

impl MissingFields {
    pub fn of(draft: &SubmissionDraft) -> Self {
        Self {
            name: draft.name.trim().is_empty(),
            email: draft.email.trim().is_empty(),
            subject: draft.subject.trim().is_empty(),
            message: draft.message.trim().is_empty(),
        }
    }

    pub fn any(self) -> bool {
        self.name || self.email || self.subject || self.message
    }
}

/// Applies the full rule set to a draft. All-or-nothing: any failing field
/// invalidates the whole submission, and every failing field is reported.
///
/// The browser adapter and the HTTP handler both call this function, so the
/// client-side and server-side rules cannot drift apart.
pub fn validate(draft: &SubmissionDraft) -> Result<ContactSubmission, FieldViolations> {
    let mut violations = BTreeMap::new();

    let name = SubmissionName::try_new(draft.name.clone())
        .map_err(|err| {
            violations.insert(
                SubmissionField::Name,
                match err {
                    SubmissionNameError::LenCharMinViolated => {
                        "Name must be at least 2 characters"
                    }
                    SubmissionNameError::LenCharMaxViolated => {
                        "Name must be at most 256 characters"
                    }
                },
            )
        })
        .ok();

    let email = SubmissionEmail::try_new(draft.email.clone())
        .map_err(|err| {
            violations.insert(
                SubmissionField::Email,
                match err {
                    SubmissionEmailError::RegexViolated => "Please enter a valid email address",
                    SubmissionEmailError::LenCharMaxViolated => {
                        "Email must be at most 256 characters"
                    }
                },
            )
        })
        .ok();

    let subject = SubmissionSubject::try_new(draft.subject.clone())
        .map_err(|err| {
            violations.insert(
                SubmissionField::Subject,
                match err {
                    SubmissionSubjectError::LenCharMinViolated => {
                        "Subject must be at least 3 characters"
                    }
                    SubmissionSubjectError::LenCharMaxViolated => {
                        "Subject must be at most 256 characters"
                    }
                },
            )
        })
        .ok();

    let message = SubmissionMessage::try_new(draft.message.clone())
        .map_err(|err| {
            violations.insert(
                SubmissionField::Message,
                match err {
                    SubmissionMessageError::LenCharMinViolated => {
                        "Message must be at least 10 characters"
                    }
                    SubmissionMessageError::LenCharMaxViolated => {
                        "Message must be at most 4096 characters"
                    }
                },
            )
        })
        .ok();

    match (name, email, subject, message) {
        (Some(name), Some(email), Some(subject), Some(message)) => Ok(ContactSubmission {
            name,
            email,
            subject,
            message,
        }),
        _ => Err(FieldViolations(violations)),
    }
}

/// Identity assigned by the persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionId {
    /// Autoincrement key of the relational backend.
    Serial(i64),
    /// Generated object id of the document backend.
    Document(String),
}

/// What the backend reports after a successful store/delivery. The email
/// delivery variant assigns no identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSubmission {
    pub id: Option<SubmissionId>,
    pub created_at: DateTime<Utc>,
}
