//! Submission payload
//!
//! The full verdict set of the unconfirmed view, mapped into the shape the
//! submission service accepts.

use chrono::NaiveDate;
use formflow_records::{Disposition, UnconfirmedView, VerifiableRecord};
use serde::{Deserialize, Serialize};

/// One verdict as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedRecord {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub label: String,
    pub disposition: Disposition,
}

impl From<&VerifiableRecord> for SubmittedRecord {
    fn from(record: &VerifiableRecord) -> Self {
        Self {
            period_start: record.period_start,
            period_end: record.period_end,
            label: record.label.clone(),
            disposition: record.disposition,
        }
    }
}

/// Payload sent to the submission service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Certification watermark the review started from
    pub watermark: Option<NaiveDate>,
    /// Verdicts, earliest period first
    pub records: Vec<SubmittedRecord>,
}

impl SubmissionPayload {
    /// Map the unconfirmed view into a payload
    ///
    /// Only periods past the watermark carry a verdict from this review;
    /// periods at or before it are already certified and are not resent.
    #[must_use]
    pub fn from_view(view: &UnconfirmedView, watermark: Option<NaiveDate>) -> Self {
        Self {
            watermark,
            records: view.iter().map(SubmittedRecord::from).collect(),
        }
    }

    /// Number of disputed periods
    #[must_use]
    pub fn disputed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.disposition.is_disputed())
            .count()
    }
}

/// Acknowledgement from the submission service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Service-assigned confirmation, when provided
    pub confirmation_id: Option<String>,
}

/// Submission failures; never retried by the machine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Service refused the payload
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// Transport failure
    #[error("submission transport failed: {0}")]
    Transport(String),
}
