//! Resumable Session Controller
//!
//! Runs once at form entry. Produces a [`SessionIntent`] from the session
//! metadata and then carries out exactly one of: start fresh, resume the saved
//! form, or discard it after confirmation.

use crate::config::FormConfig;
use crate::controls::StartControls;
use crate::error::SessionError;
use crate::marker::{RestartMarkerStore, RESTART_MARKER_VALUE};
use crate::metadata::SessionMetadata;
use crate::persistence::ProgressPersistence;
use serde::Serialize;
use tracing::{debug, info, warn};

/// What the controller decided at activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum SessionIntent {
    /// No usable saved form: start fresh, prefilling when available
    StartNew { prefill: bool },
    /// A saved, unexpired form exists
    Resume,
    /// Discarding the saved form needs explicit confirmation
    RestartConfirm { expired: bool },
}

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// `activate` has not run
    Inactive,
    /// Waiting for the user to act on the intent
    Awaiting(SessionIntent),
    /// A start, resume or restart has been carried out
    Completed,
}

/// Result of starting a fresh form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartOutcome {
    /// Page to navigate to
    pub destination: String,
    /// Prefill data was loaded
    pub prefilled: bool,
}

/// Result of resuming a saved form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResumeOutcome {
    /// Saved data loaded
    Resumed { destination: String },
    /// The saved form could not be fetched; the session falls back to a fresh start
    NotFound { destination: String, reason: String },
    /// A restart is deleting the saved form; nothing was fetched
    RestartInProgress,
}

/// Result of confirming a restart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RestartOutcome {
    /// Saved form discarded and a fresh start performed
    Restarted(StartOutcome),
    /// A restart was already recorded; nothing was deleted
    AlreadyRestarting,
}

/// Decides and performs the form-entry path
#[derive(Debug)]
pub struct SessionController<P, M> {
    config: FormConfig,
    persistence: P,
    markers: M,
    metadata: Option<SessionMetadata>,
    intent: Option<SessionIntent>,
    completed: bool,
    restarted: bool,
}

impl<P, M> SessionController<P, M>
where
    P: ProgressPersistence,
    M: RestartMarkerStore,
{
    /// Create a controller for one form
    #[must_use]
    pub fn new(config: FormConfig, persistence: P, markers: M) -> Self {
        Self {
            config,
            persistence,
            markers,
            metadata: None,
            intent: None,
            completed: false,
            restarted: false,
        }
    }

    /// Decide the entry intent from the session metadata
    ///
    /// A stale restart marker left by an interrupted deletion is dropped once
    /// the saved form is gone.
    pub fn activate(&mut self, metadata: SessionMetadata) -> SessionIntent {
        let intent = if metadata.has_expired_form() {
            SessionIntent::RestartConfirm { expired: true }
        } else if metadata.has_resumable_form() {
            SessionIntent::Resume
        } else {
            SessionIntent::StartNew {
                prefill: metadata.prefill_available,
            }
        };

        if !metadata.has_saved_form {
            self.markers.clear_marker(&self.config.restart_storage_key);
        }

        info!(form_id = %self.config.form_id, ?intent, "session activated");
        self.metadata = Some(metadata);
        self.intent = Some(intent);
        self.completed = false;
        self.restarted = false;
        intent
    }

    /// Start-screen choices for the activated session
    pub fn controls(&self) -> Result<StartControls, SessionError> {
        let metadata = self.metadata.as_ref().ok_or(SessionError::NotActivated)?;
        Ok(StartControls::derive(&self.config, metadata))
    }

    /// User chose "start over" on a resumable form
    pub fn request_start_over(&mut self) -> Result<SessionIntent, SessionError> {
        let intent = self.current_intent()?;
        if intent != SessionIntent::Resume || self.config.resume_only {
            return Err(SessionError::IllegalChoice {
                intent,
                action: "start over",
            });
        }
        let next = SessionIntent::RestartConfirm { expired: false };
        self.intent = Some(next);
        debug!(form_id = %self.config.form_id, "restart confirmation requested");
        Ok(next)
    }

    /// User dismissed the confirmation dialog
    pub fn cancel_restart(&mut self) -> Result<SessionIntent, SessionError> {
        let intent = self.current_intent()?;
        let next = match intent {
            SessionIntent::RestartConfirm { expired: false } => SessionIntent::Resume,
            other => other,
        };
        self.intent = Some(next);
        Ok(next)
    }

    /// Start a fresh form
    pub async fn start_new(&mut self) -> Result<StartOutcome, SessionError> {
        let intent = self.current_intent()?;
        let SessionIntent::StartNew { prefill } = intent else {
            return Err(SessionError::IllegalChoice {
                intent,
                action: "start a new form",
            });
        };

        let prefilled = prefill && self.fetch_prefill().await;
        self.completed = true;
        info!(form_id = %self.config.form_id, prefilled, "started new form");
        Ok(StartOutcome {
            destination: self.config.start_page.clone(),
            prefilled,
        })
    }

    /// Load the saved form and go to its last visited page
    pub async fn resume(&mut self) -> Result<ResumeOutcome, SessionError> {
        let intent = self.current_intent()?;
        if intent != SessionIntent::Resume {
            return Err(SessionError::IllegalChoice {
                intent,
                action: "resume",
            });
        }

        if self.markers.is_restarting(&self.config.restart_storage_key) {
            warn!(form_id = %self.config.form_id, "resume skipped, restart in progress");
            return Ok(ResumeOutcome::RestartInProgress);
        }

        match self
            .persistence
            .fetch_in_progress(&self.config.form_id, false)
            .await
        {
            Ok(fetched) => {
                let destination = fetched
                    .filter(|url| !url.trim().is_empty())
                    .or_else(|| {
                        self.metadata
                            .as_ref()
                            .and_then(|m| m.return_url.clone())
                            .filter(|url| !url.trim().is_empty())
                    })
                    .unwrap_or_else(|| self.config.start_page.clone());
                self.completed = true;
                info!(form_id = %self.config.form_id, %destination, "resumed saved form");
                Ok(ResumeOutcome::Resumed { destination })
            }
            Err(err) => {
                warn!(form_id = %self.config.form_id, error = %err, "saved form fetch failed");
                let prefill = self.metadata.as_ref().is_some_and(|m| m.prefill_available);
                self.intent = Some(SessionIntent::StartNew { prefill });
                Ok(ResumeOutcome::NotFound {
                    destination: self.config.start_page.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Discard the saved form and start fresh
    ///
    /// The restart marker is held only while the deletion runs: other
    /// sessions sharing the marker store neither resume nor delete again
    /// until it is done. A repeated confirmation deletes nothing.
    pub async fn confirm_restart(&mut self) -> Result<RestartOutcome, SessionError> {
        let intent = self.current_intent()?;
        let key = self.config.restart_storage_key.clone();

        if self.restarted || self.markers.is_restarting(&key) {
            warn!(form_id = %self.config.form_id, "restart already in progress");
            return Ok(RestartOutcome::AlreadyRestarting);
        }
        if !matches!(intent, SessionIntent::RestartConfirm { .. }) {
            return Err(SessionError::IllegalChoice {
                intent,
                action: "confirm restart",
            });
        }

        self.markers.set_marker(&key, RESTART_MARKER_VALUE);
        let removed = self
            .persistence
            .remove_in_progress(&self.config.form_id)
            .await;
        self.markers.clear_marker(&key);
        removed?;
        self.restarted = true;
        info!(form_id = %self.config.form_id, "saved form discarded");

        let prefill = self.metadata.as_ref().is_some_and(|m| m.prefill_available);
        self.intent = Some(SessionIntent::StartNew { prefill });
        let prefilled = prefill && self.fetch_prefill().await;
        self.completed = true;

        Ok(RestartOutcome::Restarted(StartOutcome {
            destination: self.config.restart_target().to_string(),
            prefilled,
        }))
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> ControllerPhase {
        match (self.intent, self.completed) {
            (None, _) => ControllerPhase::Inactive,
            (Some(_), true) => ControllerPhase::Completed,
            (Some(intent), false) => ControllerPhase::Awaiting(intent),
        }
    }

    /// Intent currently held
    #[inline]
    #[must_use]
    pub fn intent(&self) -> Option<SessionIntent> {
        self.intent
    }

    /// Form configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Persistence service
    #[inline]
    #[must_use]
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Marker store
    #[inline]
    #[must_use]
    pub fn markers(&self) -> &M {
        &self.markers
    }

    fn current_intent(&self) -> Result<SessionIntent, SessionError> {
        self.intent.ok_or(SessionError::NotActivated)
    }

    async fn fetch_prefill(&self) -> bool {
        match self
            .persistence
            .fetch_in_progress(&self.config.form_id, true)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                warn!(form_id = %self.config.form_id, error = %err, "prefill fetch failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::InMemoryMarkerStore;
    use crate::persistence::{MockProgressPersistence, PersistenceError};
    use std::sync::Arc;

    const KEY: &str = "testKey";

    fn config() -> FormConfig {
        let mut config = FormConfig::new("1010ez", "testing");
        config.restart_storage_key = KEY.to_string();
        config
    }

    fn controller(
        persistence: MockProgressPersistence,
    ) -> SessionController<MockProgressPersistence, Arc<InMemoryMarkerStore>> {
        SessionController::new(config(), persistence, Arc::new(InMemoryMarkerStore::new()))
    }

    #[test]
    fn activate_picks_intent() {
        let mut c = controller(MockProgressPersistence::new());

        let intent = c.activate(SessionMetadata::signed_in());
        assert_eq!(intent, SessionIntent::StartNew { prefill: false });

        let intent = c.activate(SessionMetadata::signed_in().with_saved_form(false));
        assert_eq!(intent, SessionIntent::Resume);

        let intent = c.activate(SessionMetadata::signed_in().with_saved_form(true));
        assert_eq!(intent, SessionIntent::RestartConfirm { expired: true });
    }

    #[test]
    fn actions_before_activation_fail() {
        let c = controller(MockProgressPersistence::new());
        assert!(matches!(c.controls(), Err(SessionError::NotActivated)));
        assert_eq!(c.phase(), ControllerPhase::Inactive);
    }

    #[tokio::test]
    async fn start_new_fetches_prefill() {
        let mut persistence = MockProgressPersistence::new();
        persistence
            .expect_fetch_in_progress()
            .withf(|_, prefill| *prefill)
            .times(1)
            .returning(|_, _| Ok(None));

        let mut c = controller(persistence);
        c.activate(SessionMetadata::signed_in().with_prefill(true));
        let outcome = c.start_new().await.unwrap();

        assert_eq!(outcome.destination, "testing");
        assert!(outcome.prefilled);
        assert_eq!(c.phase(), ControllerPhase::Completed);
    }

    #[tokio::test]
    async fn start_new_without_prefill_skips_fetch() {
        let mut c = controller(MockProgressPersistence::new());
        c.activate(SessionMetadata::signed_in());
        let outcome = c.start_new().await.unwrap();
        assert!(!outcome.prefilled);
    }

    #[tokio::test]
    async fn resume_goes_to_return_url() {
        let mut persistence = MockProgressPersistence::new();
        persistence
            .expect_fetch_in_progress()
            .withf(|_, prefill| !*prefill)
            .times(1)
            .returning(|_, _| Ok(Some("return/url".to_string())));

        let mut c = controller(persistence);
        c.activate(SessionMetadata::signed_in().with_saved_form(false));
        let outcome = c.resume().await.unwrap();

        assert_eq!(
            outcome,
            ResumeOutcome::Resumed {
                destination: "return/url".to_string()
            }
        );
    }

    #[tokio::test]
    async fn resume_without_return_url_falls_back_to_start_page() {
        let mut persistence = MockProgressPersistence::new();
        persistence
            .expect_fetch_in_progress()
            .returning(|_, _| Ok(Some(String::new())));

        let mut c = controller(persistence);
        c.activate(SessionMetadata::signed_in().with_saved_form(false));
        let outcome = c.resume().await.unwrap();

        assert_eq!(
            outcome,
            ResumeOutcome::Resumed {
                destination: "testing".to_string()
            }
        );
    }

    #[tokio::test]
    async fn resume_fetch_failure_is_not_found() {
        let mut persistence = MockProgressPersistence::new();
        persistence
            .expect_fetch_in_progress()
            .times(1)
            .returning(|_, _| Err(PersistenceError::Unavailable("503".to_string())));

        let mut c = controller(persistence);
        c.activate(SessionMetadata::signed_in().with_saved_form(false).with_prefill(true));
        let outcome = c.resume().await.unwrap();

        assert!(matches!(outcome, ResumeOutcome::NotFound { ref destination, .. } if destination == "testing"));
        assert_eq!(c.intent(), Some(SessionIntent::StartNew { prefill: true }));
    }

    #[tokio::test]
    async fn confirm_restart_removes_exactly_once() {
        let mut persistence = MockProgressPersistence::new();
        persistence
            .expect_remove_in_progress()
            .times(1)
            .returning(|_| Ok(()));

        let mut c = controller(persistence);
        c.activate(SessionMetadata::signed_in().with_saved_form(true));

        let first = c.confirm_restart().await.unwrap();
        assert!(matches!(first, RestartOutcome::Restarted(_)));
        assert!(!c.markers().is_restarting(KEY));

        let second = c.confirm_restart().await.unwrap();
        assert_eq!(second, RestartOutcome::AlreadyRestarting);
    }

    #[tokio::test]
    async fn start_over_requires_confirmation_and_uses_restart_destination() {
        let mut persistence = MockProgressPersistence::new();
        persistence
            .expect_remove_in_progress()
            .times(1)
            .returning(|_| Ok(()));

        let config = config().with_restart_destination("/test-page");
        let markers = Arc::new(InMemoryMarkerStore::new());
        let mut c = SessionController::new(config, persistence, Arc::clone(&markers));
        c.activate(SessionMetadata::signed_in().with_saved_form(false));

        assert!(c.confirm_restart().await.is_err());

        let intent = c.request_start_over().unwrap();
        assert_eq!(intent, SessionIntent::RestartConfirm { expired: false });

        let outcome = c.confirm_restart().await.unwrap();
        let RestartOutcome::Restarted(start) = outcome else {
            panic!("expected restart");
        };
        assert_eq!(start.destination, "/test-page");
        assert_eq!(markers.get_marker(KEY), None);
    }

    #[tokio::test]
    async fn marker_is_held_while_deleting() {
        let markers = Arc::new(InMemoryMarkerStore::new());
        let observed = Arc::clone(&markers);
        let mut persistence = MockProgressPersistence::new();
        persistence
            .expect_remove_in_progress()
            .times(1)
            .returning(move |_| {
                assert!(observed.is_restarting(KEY));
                Ok(())
            });

        let mut c = SessionController::new(config(), persistence, Arc::clone(&markers));
        c.activate(SessionMetadata::signed_in().with_saved_form(true));
        c.confirm_restart().await.unwrap();

        assert!(markers.is_empty());
    }

    #[tokio::test]
    async fn later_session_resumes_after_restart() {
        let markers = Arc::new(InMemoryMarkerStore::new());

        let mut removing = MockProgressPersistence::new();
        removing
            .expect_remove_in_progress()
            .times(1)
            .returning(|_| Ok(()));
        let mut first = SessionController::new(config(), removing, Arc::clone(&markers));
        first.activate(SessionMetadata::signed_in().with_saved_form(true));
        first.confirm_restart().await.unwrap();

        let mut fetching = MockProgressPersistence::new();
        fetching
            .expect_fetch_in_progress()
            .times(1)
            .returning(|_, _| Ok(Some("page-2".to_string())));
        let mut later = SessionController::new(config(), fetching, Arc::clone(&markers));
        later.activate(SessionMetadata::signed_in().with_saved_form(false));

        assert_eq!(
            later.resume().await.unwrap(),
            ResumeOutcome::Resumed {
                destination: "page-2".to_string()
            }
        );
        assert!(later.request_start_over().is_ok());
    }

    #[tokio::test]
    async fn failed_removal_clears_marker() {
        let mut persistence = MockProgressPersistence::new();
        persistence
            .expect_remove_in_progress()
            .returning(|_| Err(PersistenceError::Unavailable("timeout".to_string())));

        let mut c = controller(persistence);
        c.activate(SessionMetadata::signed_in().with_saved_form(true));

        let err = c.confirm_restart().await.unwrap_err();
        assert!(err.is_retryable());
        assert!(!c.markers().is_restarting(KEY));
    }

    #[tokio::test]
    async fn resume_is_skipped_while_restarting() {
        let mut c = controller(MockProgressPersistence::new());
        c.markers().set_marker(KEY, RESTART_MARKER_VALUE);
        c.activate(SessionMetadata::signed_in().with_saved_form(false));

        let outcome = c.resume().await.unwrap();
        assert_eq!(outcome, ResumeOutcome::RestartInProgress);
    }

    #[test]
    fn cancel_restart_returns_to_resume() {
        let mut c = controller(MockProgressPersistence::new());
        c.activate(SessionMetadata::signed_in().with_saved_form(false));
        c.request_start_over().unwrap();
        assert_eq!(c.cancel_restart().unwrap(), SessionIntent::Resume);
    }

    #[test]
    fn resume_only_rejects_start_over() {
        let mut c = SessionController::new(
            config().with_resume_only(true),
            MockProgressPersistence::new(),
            InMemoryMarkerStore::new(),
        );
        c.activate(SessionMetadata::signed_in().with_saved_form(false));
        let err = c.request_start_over().unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn activation_without_saved_form_drops_stale_marker() {
        let mut c = controller(MockProgressPersistence::new());
        c.markers().set_marker(KEY, RESTART_MARKER_VALUE);
        c.activate(SessionMetadata::signed_in());
        assert!(!c.markers().is_restarting(KEY));
    }
}
