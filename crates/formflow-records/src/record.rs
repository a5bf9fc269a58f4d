//! Verifiable records and their identity
//!
//! A record is addressed by its [`PeriodKey`], never by position: positions
//! shift every time the unconfirmed view is recomputed from a fresh snapshot.

use crate::disposition::Disposition;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Immutable identity of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    /// First day of the period
    pub period_start: NaiveDate,
    /// Last day of the period
    pub period_end: NaiveDate,
}

impl PeriodKey {
    /// Create new key
    #[inline]
    #[must_use]
    pub fn new(period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            period_start,
            period_end,
        }
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.period_start, self.period_end)
    }
}

/// One period to be confirmed by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiableRecord {
    /// First day of the period
    pub period_start: NaiveDate,
    /// Last day of the period
    pub period_end: NaiveDate,
    /// Human-readable period identifier (e.g. "March 2024")
    pub label: String,
    /// Recorded verdict
    #[serde(default)]
    pub disposition: Disposition,
}

impl VerifiableRecord {
    /// Create new record with no verdict
    #[inline]
    #[must_use]
    pub fn new(period_start: NaiveDate, period_end: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            period_start,
            period_end,
            label: label.into(),
            disposition: Disposition::Unset,
        }
    }

    /// With a recorded verdict
    #[inline]
    #[must_use]
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Identity of this record
    #[inline]
    #[must_use]
    pub fn key(&self) -> PeriodKey {
        PeriodKey::new(self.period_start, self.period_end)
    }

    /// Whether this record is the one addressed by `key`
    #[inline]
    #[must_use]
    pub fn matches(&self, key: &PeriodKey) -> bool {
        self.period_start == key.period_start && self.period_end == key.period_end
    }
}
