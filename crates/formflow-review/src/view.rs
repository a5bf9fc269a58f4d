//! Derived view state for the presentation layer

use crate::phase::ReviewPhase;
use formflow_records::{Disposition, VerifiableRecord};
use serde::Serialize;

/// Progress-bar position; the terminal review is the last segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub segment: usize,
    pub total: usize,
}

/// Everything a page needs to render the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    pub phase: ReviewPhase,
    /// Record under review (reviewing phases only)
    pub current: Option<VerifiableRecord>,
    pub pending_disposition: Disposition,
    pub progress: Progress,
    /// "Verify <label>" or "Review verifications"
    pub title_postfix: String,
    /// Show "please select an option"
    pub show_selection_error: bool,
    /// Earliest disputed record, if any
    pub disputed: Option<VerifiableRecord>,
    /// Terminal review reached before the last record because of a dispute
    pub skipped_ahead: bool,
    /// Payments pause while a dispute is outstanding
    pub review_paused: bool,
}

pub(crate) const REVIEW_TITLE: &str = "Review verifications";

pub(crate) fn verify_title(record: &VerifiableRecord) -> String {
    format!("Verify {}", record.label)
}
