use anyhow::anyhow;
use chrono::Utc;
use folio_email_contracts::{ContentType, Email, EmailService, Mailbox};
use folio_models::contact::{ContactSubmission, StoredSubmission};
use folio_persistence_contracts::{ContactStore, StoreError};

/// The delivery variant of the contact store: nothing is persisted, the
/// submission is forwarded as one outbound email instead. "Stored" means the
/// transport accepted the message, not that anyone read it.
#[derive(Debug, Clone)]
pub struct SmtpContactStore<Email> {
    email: Email,
    config: SmtpContactStoreConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpContactStoreConfig {
    pub recipient: String,
}

impl<Email> SmtpContactStore<Email> {
    pub fn new(email: Email, config: SmtpContactStoreConfig) -> Self {
        Self { email, config }
    }
}

impl<EmailS> ContactStore for SmtpContactStore<EmailS>
where
    EmailS: EmailService,
{
    async fn store(&self, submission: &ContactSubmission) -> Result<StoredSubmission, StoreError> {
        let email = Email {
            from: Mailbox::with_name(&**submission.name, &**submission.email),
            recipient: Mailbox::new(self.config.recipient.clone()),
            subject: (*submission.subject).clone(),
            body: (*submission.message).clone(),
            content_type: ContentType::Text,
        };

        if !self.email.send(email).await.map_err(StoreError::Other)? {
            return Err(StoreError::Other(anyhow!(
                "The smtp server did not accept the message"
            )));
        }

        Ok(StoredSubmission {
            id: None,
            created_at: Utc::now(),
        })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.email.ping().await
    }
}

#[cfg(test)]
mod tests {
    use folio_email_contracts::MockEmailService;
    use folio_models::contact::{validate, SubmissionDraft};

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

    fn expected_email() -> Email {
        Email {
            from: Mailbox::with_name("Ada", "ada@example.com"),
            recipient: Mailbox::new("contact@example.com"),
            subject: "Hi".into(),
            body: "Hello there, testing.".into(),
            content_type: ContentType::Text,
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let config = SmtpContactStoreConfig {
            recipient: "contact@example.com".into(),
        };
        let email = MockEmailService::new().with_send(expected_email(), true);
        let sut = SmtpContactStore::new(email, config);

        // Act
        let result = sut.store(&submission()).await;

        // Assert
        let stored = result.unwrap();
        assert_eq!(stored.id, None);
    }

    #[tokio::test]
    async fn rejected_by_transport() {
        // Arrange
        let config = SmtpContactStoreConfig {
            recipient: "contact@example.com".into(),
        };
        let email = MockEmailService::new().with_send(expected_email(), false);
        let sut = SmtpContactStore::new(email, config);

        // Act
        let result = sut.store(&submission()).await;

        // Assert
        assert!(matches!(result, Err(StoreError::Other(_))));
    }
}
