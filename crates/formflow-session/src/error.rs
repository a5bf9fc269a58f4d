//! Error types for the session controller

use crate::controller::SessionIntent;
use crate::persistence::PersistenceError;

/// Session controller errors
///
/// Fetch failures are not errors; they surface as not-found outcomes.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An action was requested before `activate`
    #[error("session controller has not been activated")]
    NotActivated,

    /// The action does not apply to the current intent
    #[error("cannot {action} while intent is {intent:?}")]
    IllegalChoice {
        /// Intent the controller is holding
        intent: SessionIntent,
        /// Requested action
        action: &'static str,
    },

    /// Discarding the saved form failed
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl SessionError {
    /// Caller invoked an action out of order
    #[inline]
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::NotActivated | Self::IllegalChoice { .. })
    }

    /// Whether retrying the same action may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(PersistenceError::Unavailable(_)))
    }
}
