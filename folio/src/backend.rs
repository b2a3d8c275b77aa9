use anyhow::anyhow;
use folio_email_impl::EmailServiceImpl;
use folio_models::contact::{ContactSubmission, StoredSubmission};
use folio_persistence_contracts::{ContactStore, StoreError};
use folio_persistence_mongodb::MongoContactStore;
use folio_persistence_postgres::PostgresContactStore;
use folio_persistence_smtp::SmtpContactStore;

/// The persistence backend selected by `contact.backend`, unified behind the
/// [`ContactStore`] contract.
#[derive(Debug, Clone)]
pub enum ContactBackend {
    Postgres(PostgresContactStore),
    Mongodb(MongoContactStore),
    Smtp(SmtpContactStore<EmailServiceImpl>),
    /// Startup exhausted its connection attempts; the server runs degraded
    /// and every store call fails until a restart.
    Unavailable,
}

impl ContactStore for ContactBackend {
    async fn store(&self, submission: &ContactSubmission) -> Result<StoredSubmission, StoreError> {
        match self {
            Self::Postgres(store) => store.store(submission).await,
            Self::Mongodb(store) => store.store(submission).await,
            Self::Smtp(store) => store.store(submission).await,
            Self::Unavailable => Err(StoreError::Unavailable),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Postgres(store) => store.ping().await,
            Self::Mongodb(store) => store.ping().await,
            Self::Smtp(store) => store.ping().await,
            Self::Unavailable => Err(anyhow!("contact message store is unavailable")),
        }
    }
}
