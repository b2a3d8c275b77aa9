use folio_core_contact_contracts::{ContactService, ContactSubmitError};
use folio_models::contact::{ContactSubmission, StoredSubmission};
use folio_persistence_contracts::ContactStore;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Store> {
    store: Store,
}

impl<Store> ContactServiceImpl<Store> {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl<Store> ContactService for ContactServiceImpl<Store>
where
    Store: ContactStore,
{
    async fn submit_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<StoredSubmission, ContactSubmitError> {
        let stored = self.store.store(&submission).await?;
        debug!(id = ?stored.id, created_at = %stored.created_at, "contact submission stored");
        Ok(stored)
    }
}
