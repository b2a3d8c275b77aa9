use std::future::Future;

use folio_models::contact::{ContactSubmission, StoredSubmission};
use thiserror::Error;

/// The pluggable backend a validated submission is handed to: the relational
/// store inserts a row, the document store inserts a document, the smtp
/// variant forwards the submission as an outbound email.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactStore: Send + Sync + 'static {
    /// Durably records or forwards one submission. Callers invoke this at
    /// most once per accepted request; there are no per-request retries.
    fn store(
        &self,
        submission: &ContactSubmission,
    ) -> impl Future<Output = Result<StoredSubmission, StoreError>> + Send;

    /// Verify the backend is reachable.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The process started without a reachable datastore and is serving in
    /// degraded mode.
    #[error("contact message store is unavailable")]
    Unavailable,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactStore {
    pub fn with_store(
        mut self,
        submission: ContactSubmission,
        result: Result<StoredSubmission, StoreError>,
    ) -> Self {
        self.expect_store()
            .once()
            .withf(move |s| *s == submission)
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
