//! Review phases and the intent table
//!
//! Every user intent is checked against [`permitted_intents`] before the
//! machine touches its cursor.

use crate::error::ReviewError;
use formflow_records::{Disposition, PeriodKey};
use serde::Serialize;

/// Where the machine is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ReviewPhase {
    /// Collecting a verdict for the record at `index`
    Reviewing { index: usize, editing: bool },
    /// All records dispositioned, or a dispute is outstanding
    TerminalReview,
    /// Submission in flight
    Submitting,
    /// Submission accepted
    Submitted,
    /// Review abandoned; the caller has been sent back to the landing page
    Exited,
}

impl ReviewPhase {
    /// Table key for this phase
    #[must_use]
    pub fn kind(self) -> PhaseKind {
        match self {
            Self::Reviewing { editing: false, .. } => PhaseKind::Reviewing,
            Self::Reviewing { editing: true, .. } => PhaseKind::Editing,
            Self::TerminalReview => PhaseKind::TerminalReview,
            Self::Submitting => PhaseKind::Submitting,
            Self::Submitted => PhaseKind::Submitted,
            Self::Exited => PhaseKind::Exited,
        }
    }
}

/// Fieldless phase, used as the intent-table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PhaseKind {
    Reviewing,
    Editing,
    TerminalReview,
    Submitting,
    Submitted,
    Exited,
}

/// User-triggered events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewIntent {
    /// Choose a verdict for the current record
    Select(Disposition),
    /// Persist the verdict and move on
    Advance,
    /// Step back
    Retreat,
    /// Reopen a record from the terminal review
    JumpToEdit(PeriodKey),
    /// Abandon in-progress verdicts and leave
    FinishLater,
    /// Send the verdict set
    Submit,
}

impl ReviewIntent {
    /// Table key for this intent
    #[must_use]
    pub fn kind(self) -> IntentKind {
        match self {
            Self::Select(_) => IntentKind::Select,
            Self::Advance => IntentKind::Advance,
            Self::Retreat => IntentKind::Retreat,
            Self::JumpToEdit(_) => IntentKind::JumpToEdit,
            Self::FinishLater => IntentKind::FinishLater,
            Self::Submit => IntentKind::Submit,
        }
    }
}

/// Fieldless intent, used as the intent-table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntentKind {
    Select,
    Advance,
    Retreat,
    JumpToEdit,
    FinishLater,
    Submit,
    /// Submission result arrived
    SettleSubmission,
}

/// Intents accepted in a phase
///
/// `Submit` stays accepted while a submission is in flight or done so that
/// repeated clicks are absorbed instead of rejected.
#[must_use]
pub fn permitted_intents(phase: PhaseKind) -> &'static [IntentKind] {
    use IntentKind::*;
    match phase {
        PhaseKind::Reviewing => &[Select, Advance, Retreat, FinishLater],
        PhaseKind::Editing => &[Select, Advance, Retreat, FinishLater],
        PhaseKind::TerminalReview => &[Retreat, JumpToEdit, FinishLater, Submit],
        PhaseKind::Submitting => &[Submit, SettleSubmission],
        PhaseKind::Submitted => &[Submit],
        PhaseKind::Exited => &[],
    }
}

/// Check an intent against the table
pub fn validate_intent(phase: PhaseKind, intent: IntentKind) -> Result<(), ReviewError> {
    if permitted_intents(phase).contains(&intent) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("Illegal review intent attempted: {intent:?} while {phase:?}");

        Err(ReviewError::IllegalTransition { phase, intent })
    }
}
