use anyhow::Context;
use folio_models::contact::{ContactSubmission, StoredSubmission, SubmissionId};
use folio_persistence_contracts::{ContactStore, StoreError};
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime},
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "contact_messages";

/// One document per submission; the schema is implicit.
#[derive(Debug, Serialize, Deserialize)]
struct ContactMessageDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    email: String,
    subject: String,
    message: String,
    created_at: DateTime,
}

#[derive(Debug, Clone)]
pub struct MongoContactStore {
    database: Database,
    collection: Collection<ContactMessageDocument>,
}

#[derive(Debug)]
pub struct MongoContactStoreConfig {
    pub url: String,
    pub database: String,
}

impl MongoContactStore {
    pub async fn connect(config: &MongoContactStoreConfig) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&config.url)
            .await
            .context("Failed to connect to MongoDB")?;
        let database = client.database(&config.database);
        let collection = database.collection(COLLECTION);

        Ok(Self {
            database,
            collection,
        })
    }
}

impl ContactStore for MongoContactStore {
    async fn store(&self, submission: &ContactSubmission) -> Result<StoredSubmission, StoreError> {
        let created_at = DateTime::now();
        let result = self
            .collection
            .insert_one(ContactMessageDocument {
                id: None,
                name: (*submission.name).clone(),
                email: (*submission.email).clone(),
                subject: (*submission.subject).clone(),
                message: (*submission.message).clone(),
                created_at,
            })
            .await
            .context("Failed to insert contact message")?;

        let id = result
            .inserted_id
            .as_object_id()
            .context("Inserted document has no object id")?;

        Ok(StoredSubmission {
            id: Some(SubmissionId::Document(id.to_hex())),
            created_at: created_at.to_chrono(),
        })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.database
            .run_command(doc! {"ping": 1})
            .await
            .context("Failed to ping MongoDB")?;
        Ok(())
    }
}
