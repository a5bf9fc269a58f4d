//! Transition results and effect descriptors

use crate::submission::SubmissionPayload;
use formflow_records::VerifiableRecord;
use serde::Serialize;

/// Navigation targets; the caller maps them to routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Entry/landing stage of the review
    Landing,
    /// Submission accepted
    SubmissionSucceeded,
    /// Submission failed
    SubmissionFailed,
}

/// Side effect the caller must perform, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", content = "value", rename_all = "snake_case")]
pub enum Effect {
    /// Replace the store's record array
    PersistDispositions(Vec<VerifiableRecord>),
    /// Bring the page heading back into view
    ScrollToTop,
    /// Send the verdict set to the submission service
    Submit(SubmissionPayload),
    /// Route change; always last
    Navigate(Destination),
}

/// How a transition resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Verdict selected for the current record
    Selected,
    /// Cursor moved
    Moved,
    /// Advance without a verdict; cursor unchanged
    ValidationFailed,
    /// Edit mode entered on a record
    EnteredEdit,
    /// Review abandoned
    Exited,
    /// Submission dispatched
    SubmitStarted,
    /// Re-entrant trigger absorbed
    Ignored,
    /// Submission accepted
    Submitted,
    /// Submission failed; terminal review remains open
    SubmitFailed,
}

/// Result of one transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Transition {
    #[inline]
    #[must_use]
    pub(crate) fn new(outcome: Outcome, effects: Vec<Effect>) -> Self {
        Self { outcome, effects }
    }

    #[inline]
    #[must_use]
    pub(crate) fn quiet(outcome: Outcome) -> Self {
        Self::new(outcome, Vec::new())
    }

    /// Records to persist, if this transition writes the store
    #[must_use]
    pub fn persisted(&self) -> Option<&[VerifiableRecord]> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::PersistDispositions(records) => Some(records.as_slice()),
            _ => None,
        })
    }

    /// Navigation target, if this transition leaves the page
    #[must_use]
    pub fn destination(&self) -> Option<Destination> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::Navigate(destination) => Some(*destination),
            _ => None,
        })
    }
}
