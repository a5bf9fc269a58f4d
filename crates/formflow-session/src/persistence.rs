//! Progress-persistence port
//!
//! The service that stores in-progress forms. The controller never touches
//! storage itself; every fetch and deletion goes through this trait.

use async_trait::async_trait;
use std::sync::Arc;

/// Errors reported by the persistence service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// No saved form for this id
    #[error("no saved form for {0}")]
    NotFound(String),

    /// Transport or backend failure
    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}

/// Fetches and discards saved form data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressPersistence: Send + Sync {
    /// Load the saved form (or prefill data when `prefill` is set)
    ///
    /// Returns the saved form's last visited page, when it has one.
    async fn fetch_in_progress(
        &self,
        form_id: &str,
        prefill: bool,
    ) -> Result<Option<String>, PersistenceError>;

    /// Discard the saved form
    async fn remove_in_progress(&self, form_id: &str) -> Result<(), PersistenceError>;
}

#[async_trait]
impl<T: ProgressPersistence + ?Sized> ProgressPersistence for Arc<T> {
    async fn fetch_in_progress(
        &self,
        form_id: &str,
        prefill: bool,
    ) -> Result<Option<String>, PersistenceError> {
        (**self).fetch_in_progress(form_id, prefill).await
    }

    async fn remove_in_progress(&self, form_id: &str) -> Result<(), PersistenceError> {
        (**self).remove_in_progress(form_id).await
    }
}
