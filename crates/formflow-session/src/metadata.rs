//! Persisted-session metadata supplied by the session store

use serde::{Deserialize, Serialize};

/// Read-only facts about the user's saved form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionMetadata {
    /// User is authenticated
    pub is_logged_in: bool,
    /// A saved in-progress form exists
    pub has_saved_form: bool,
    /// The saved form has expired
    pub is_expired: bool,
    /// Prefill data can be fetched for a fresh start
    pub prefill_available: bool,
    /// Last visited page of the saved form, if known
    pub return_url: Option<String>,
}

impl SessionMetadata {
    /// Metadata for a signed-in user
    #[inline]
    #[must_use]
    pub fn signed_in() -> Self {
        Self {
            is_logged_in: true,
            ..Self::default()
        }
    }

    /// With a saved form
    #[inline]
    #[must_use]
    pub fn with_saved_form(mut self, expired: bool) -> Self {
        self.has_saved_form = true;
        self.is_expired = expired;
        self
    }

    /// With prefill availability
    #[inline]
    #[must_use]
    pub fn with_prefill(mut self, available: bool) -> Self {
        self.prefill_available = available;
        self
    }

    /// With a last-visited page
    #[inline]
    #[must_use]
    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// A saved form that can still be resumed
    ///
    /// Saved forms only exist for signed-in users.
    #[inline]
    #[must_use]
    pub fn has_resumable_form(&self) -> bool {
        self.is_logged_in && self.has_saved_form && !self.is_expired
    }

    /// A saved form that has expired
    #[inline]
    #[must_use]
    pub fn has_expired_form(&self) -> bool {
        self.is_logged_in && self.has_saved_form && self.is_expired
    }
}
