use folio_config::MongodbConfig;
use folio_persistence_contracts::ContactStore;
use folio_persistence_mongodb::{MongoContactStore, MongoContactStoreConfig};

/// Connect to MongoDB and verify the connection with a round trip.
pub async fn connect(config: &MongodbConfig) -> anyhow::Result<MongoContactStore> {
    let store = MongoContactStore::connect(&MongoContactStoreConfig {
        url: config.url.clone(),
        database: config.database.clone(),
    })
    .await?;
    store.ping().await?;
    Ok(store)
}
