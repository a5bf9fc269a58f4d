//! Form-entry driver
//!
//! Runs the [`SessionController`] and performs the navigation its outcomes
//! call for.

use crate::error::FormflowError;
use crate::ports::Navigator;
use formflow_session::{
    ProgressPersistence, RestartMarkerStore, RestartOutcome, ResumeOutcome, SessionController,
    SessionError, SessionIntent, SessionMetadata, StartControls,
};
use serde::Serialize;
use tracing::{debug, info};

/// What an entry action did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// Navigated into the form
    Navigated { route: String, prefilled: bool },
    /// Saved form could not be fetched; a fresh form was started instead
    FellBack {
        route: String,
        reason: String,
        prefilled: bool,
    },
    /// Confirmation dialog is showing; nothing destroyed yet
    ConfirmationShown,
    /// Confirmation dialog closed without a restart
    ConfirmationDismissed,
    /// A restart is deleting the saved form; resume skipped
    RestartInProgress,
    /// Restart already confirmed; nothing deleted
    AlreadyRestarting,
}

/// Entry-screen flow for one form
#[derive(Debug)]
pub struct EntryFlow<P, M, N> {
    controller: SessionController<P, M>,
    navigator: N,
}

impl<P, M, N> EntryFlow<P, M, N>
where
    P: ProgressPersistence,
    M: RestartMarkerStore,
    N: Navigator,
{
    #[must_use]
    pub fn new(controller: SessionController<P, M>, navigator: N) -> Self {
        Self {
            controller,
            navigator,
        }
    }

    /// Decide the entry intent
    pub fn activate(&mut self, metadata: SessionMetadata) -> SessionIntent {
        self.controller.activate(metadata)
    }

    /// Choices the entry screen offers
    pub fn controls(&self) -> Result<StartControls, FormflowError> {
        Ok(self.controller.controls()?)
    }

    /// Primary action for the current intent
    ///
    /// A restart-confirm intent only opens the dialog.
    pub async fn begin(&mut self) -> Result<EntryOutcome, FormflowError> {
        match self.current_intent()? {
            SessionIntent::StartNew { .. } => self.start_new().await,
            SessionIntent::Resume => self.continue_saved().await,
            SessionIntent::RestartConfirm { .. } => Ok(EntryOutcome::ConfirmationShown),
        }
    }

    /// Start a fresh form
    pub async fn start_new(&mut self) -> Result<EntryOutcome, FormflowError> {
        let started = self.controller.start_new().await?;
        self.navigator.navigate(&started.destination);
        Ok(EntryOutcome::Navigated {
            route: started.destination,
            prefilled: started.prefilled,
        })
    }

    /// Resume the saved form, or start fresh when it cannot be fetched
    pub async fn continue_saved(&mut self) -> Result<EntryOutcome, FormflowError> {
        match self.controller.resume().await? {
            ResumeOutcome::Resumed { destination } => {
                self.navigator.navigate(&destination);
                Ok(EntryOutcome::Navigated {
                    route: destination,
                    prefilled: false,
                })
            }
            ResumeOutcome::NotFound { reason, .. } => {
                info!(%reason, "saved form unavailable, starting fresh");
                let started = self.controller.start_new().await?;
                self.navigator.navigate(&started.destination);
                Ok(EntryOutcome::FellBack {
                    route: started.destination,
                    reason,
                    prefilled: started.prefilled,
                })
            }
            ResumeOutcome::RestartInProgress => Ok(EntryOutcome::RestartInProgress),
        }
    }

    /// User chose "start over"
    pub fn start_over(&mut self) -> Result<EntryOutcome, FormflowError> {
        self.controller.request_start_over()?;
        debug!("start-over confirmation shown");
        Ok(EntryOutcome::ConfirmationShown)
    }

    /// User closed the confirmation dialog
    pub fn cancel_restart(&mut self) -> Result<EntryOutcome, FormflowError> {
        self.controller.cancel_restart()?;
        Ok(EntryOutcome::ConfirmationDismissed)
    }

    /// User confirmed the restart
    pub async fn confirm_restart(&mut self) -> Result<EntryOutcome, FormflowError> {
        match self.controller.confirm_restart().await? {
            RestartOutcome::Restarted(started) => {
                self.navigator.navigate(&started.destination);
                Ok(EntryOutcome::Navigated {
                    route: started.destination,
                    prefilled: started.prefilled,
                })
            }
            RestartOutcome::AlreadyRestarting => Ok(EntryOutcome::AlreadyRestarting),
        }
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &SessionController<P, M> {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    fn current_intent(&self) -> Result<SessionIntent, FormflowError> {
        self.controller
            .intent()
            .ok_or_else(|| SessionError::NotActivated.into())
    }
}
