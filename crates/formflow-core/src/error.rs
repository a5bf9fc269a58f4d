//! Error types for Formflow drivers

use crate::config::ConfigError;
use formflow_review::ReviewError;
use formflow_session::SessionError;

/// Main Formflow error type
#[derive(Debug, thiserror::Error)]
pub enum FormflowError {
    /// Session controller failure
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Review state machine contract violation
    #[error("review error: {0}")]
    Review(#[from] ReviewError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The review needs a signed-in user
    #[error("user is not signed in")]
    NotSignedIn,

    /// Scenario document could not be used
    #[error("invalid scenario: {0}")]
    Scenario(String),
}

impl FormflowError {
    /// Whether the user can recover without a code change
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Session(e) => e.is_retryable(),
            Self::NotSignedIn => true,
            Self::Review(_) | Self::Config(_) | Self::Scenario(_) => false,
        }
    }

    /// Whether the caller invoked an operation out of contract
    #[inline]
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::Session(e) => e.is_contract_violation(),
            Self::Review(e) => e.is_contract_violation(),
            _ => false,
        }
    }
}
