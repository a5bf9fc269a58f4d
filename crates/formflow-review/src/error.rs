//! Error types for the review state machine
//!
//! Validation failures, empty views and disputes are outcomes, not errors.
//! Everything here is a caller contract violation.

use crate::phase::{IntentKind, PhaseKind};
use formflow_records::{PeriodKey, RecordError};

/// Review state machine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    /// Intent not permitted in the current phase
    #[error("{intent:?} is not permitted while {phase:?}")]
    IllegalTransition {
        /// Phase the machine was in
        phase: PhaseKind,
        /// Rejected intent
        intent: IntentKind,
    },

    /// Record key absent from the current snapshot
    #[error("no unconfirmed record for period {0}")]
    RecordNotFound(PeriodKey),

    /// Cursor points past the view
    #[error("cursor index {index} outside view of {len} records")]
    CursorOutOfRange { index: usize, len: usize },

    /// Snapshot failed validation
    #[error("invalid record snapshot: {0}")]
    InvalidSnapshot(RecordError),
}

impl ReviewError {
    /// Whether the caller broke the machine's contract
    #[inline]
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::InvalidSnapshot(_))
    }
}

impl From<RecordError> for ReviewError {
    fn from(value: RecordError) -> Self {
        match value {
            RecordError::UnknownPeriod(key) => Self::RecordNotFound(key),
            other => Self::InvalidSnapshot(other),
        }
    }
}
