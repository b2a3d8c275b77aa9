use folio_config::DatabaseConfig;
use folio_persistence_contracts::ContactStore;
use folio_persistence_postgres::{PostgresContactStore, PostgresContactStoreConfig};

/// Connect to the database and verify the connection with a round trip.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<PostgresContactStore> {
    let store = PostgresContactStore::connect(&PostgresContactStoreConfig {
        url: config.connection_url()?,
        max_connections: config.max_connections,
    })
    .await?;
    store.ping().await?;
    Ok(store)
}
