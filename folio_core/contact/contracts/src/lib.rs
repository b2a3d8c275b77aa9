use std::future::Future;

use folio_models::contact::{ContactSubmission, StoredSubmission};
use folio_persistence_contracts::StoreError;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Hands a validated submission to the configured persistence backend.
    fn submit_message(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<StoredSubmission, ContactSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_submit_message(
        mut self,
        submission: ContactSubmission,
        result: Result<StoredSubmission, ContactSubmitError>,
    ) -> Self {
        self.expect_submit_message()
            .once()
            .withf(move |s| *s == submission)
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
