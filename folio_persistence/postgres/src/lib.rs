use anyhow::Context;
use bb8::Pool;
use bb8_postgres::{tokio_postgres::NoTls, PostgresConnectionManager};
use folio_models::contact::{ContactSubmission, StoredSubmission, SubmissionId};
use folio_persistence_contracts::{ContactStore, StoreError};

/// Applied idempotently at startup, never per request.
const CREATE_CONTACT_MESSAGES: &str = "create table if not exists contact_messages ( \
     id bigserial primary key, \
     name text not null, \
     email text not null, \
     subject text not null, \
     message text not null, \
     created_at timestamptz not null default now() \
 )";

const INSERT_CONTACT_MESSAGE: &str = "insert into contact_messages (name, email, subject, \
     message) values ($1, $2, $3, $4) returning id, created_at";

#[derive(Debug, Clone)]
pub struct PostgresContactStore {
    pool: Pool<PostgresConnectionManager<NoTls>>,
}

#[derive(Debug)]
pub struct PostgresContactStoreConfig {
    pub url: String,
    pub max_connections: u32,
}

impl PostgresContactStore {
    /// Builds the connection pool. Callers are expected to [`ping`] once to
    /// verify connectivity before going live.
    ///
    /// [`ping`]: ContactStore::ping
    pub async fn connect(config: &PostgresContactStoreConfig) -> anyhow::Result<Self> {
        let manager = PostgresConnectionManager::new(config.url.parse()?, NoTls);
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)
            .await?;

        Ok(Self { pool })
    }

    /// Creates the `contact_messages` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire database connection")?;
        conn.execute(CREATE_CONTACT_MESSAGES, &[])
            .await
            .context("Failed to create contact_messages table")?;
        Ok(())
    }
}

impl ContactStore for PostgresContactStore {
    async fn store(&self, submission: &ContactSubmission) -> Result<StoredSubmission, StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire database connection")?;

        let row = conn
            .query_one(
                INSERT_CONTACT_MESSAGE,
                &[
                    &*submission.name,
                    &*submission.email,
                    &*submission.subject,
                    &*submission.message,
                ],
            )
            .await
            .context("Failed to insert contact message")?;

        let id = row.try_get(0).context("Failed to decode id")?;
        let created_at = row.try_get(1).context("Failed to decode created_at")?;

        Ok(StoredSubmission {
            id: Some(SubmissionId::Serial(id)),
            created_at,
        })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire database connection")?;
        conn.query_one("select 1", &[])
            .await
            .context("Failed to ping database")?;
        Ok(())
    }
}
