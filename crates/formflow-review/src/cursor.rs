//! The machine's position within the unconfirmed view

use formflow_records::{Disposition, PeriodKey};
use serde::Serialize;

/// Review position
///
/// `current_index == len(view)` denotes the terminal review phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewCursor {
    /// Index into the unconfirmed view
    pub current_index: usize,
    /// Correcting a verdict out of sequence
    pub editing: bool,
    /// Verdict selected for the current record, not yet persisted
    pub pending_disposition: Disposition,
    /// User tried to advance without choosing a verdict
    pub continue_attempted: bool,
    /// Disputed record that opened the current edit
    pub edit_target: Option<PeriodKey>,
}

impl ReviewCursor {
    /// Cursor editing the record at `index`
    #[must_use]
    pub fn editing_at(index: usize, pending: Disposition, target: Option<PeriodKey>) -> Self {
        Self {
            current_index: index,
            editing: true,
            pending_disposition: pending,
            continue_attempted: false,
            edit_target: target,
        }
    }

    /// Leave edit mode
    pub fn finish_edit(&mut self) {
        self.editing = false;
        self.edit_target = None;
    }
}
