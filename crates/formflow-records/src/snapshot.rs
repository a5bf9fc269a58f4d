//! Record snapshots and the unconfirmed view
//!
//! The record store delivers records newest first. The view presented for
//! review is the prefix of the store order ending at the last record whose
//! `period_end` is past the watermark, reversed so the earliest unconfirmed
//! period comes first.

use crate::disposition::Disposition;
use crate::record::{PeriodKey, VerifiableRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Errors raised when addressing or validating records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// No record with this key in the snapshot
    #[error("no record for period {0}")]
    UnknownPeriod(PeriodKey),

    /// Period ends before it starts
    #[error("period {0} ends before it starts")]
    InvertedPeriod(PeriodKey),

    /// Two records share the same period
    #[error("duplicate record for period {0}")]
    DuplicatePeriod(PeriodKey),
}

/// Immutable copy of the record store
///
/// Replaced wholesale whenever the store refreshes; never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Records in store order (newest first)
    records: Vec<VerifiableRecord>,
    /// Last period already certified; `None` when nothing is certified yet
    watermark: Option<NaiveDate>,
}

impl RecordSnapshot {
    /// Create new snapshot
    #[inline]
    #[must_use]
    pub fn new(records: Vec<VerifiableRecord>, watermark: Option<NaiveDate>) -> Self {
        Self { records, watermark }
    }

    /// All records in store order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[VerifiableRecord] {
        &self.records
    }

    /// Certification watermark
    #[inline]
    #[must_use]
    pub fn watermark(&self) -> Option<NaiveDate> {
        self.watermark
    }

    /// Check period bounds and key uniqueness
    pub fn validate(&self) -> Result<(), RecordError> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            let key = record.key();
            if record.period_end < record.period_start {
                return Err(RecordError::InvertedPeriod(key));
            }
            if !seen.insert(key) {
                return Err(RecordError::DuplicatePeriod(key));
            }
        }
        Ok(())
    }

    /// Store-order index of the earliest record still needing review
    ///
    /// This is the last record (in newest-first order) past the watermark.
    #[must_use]
    pub fn earliest_unconfirmed_index(&self) -> Option<usize> {
        self.records
            .iter()
            .rposition(|record| self.is_past_watermark(record))
    }

    /// Records needing review, earliest first
    #[must_use]
    pub fn unconfirmed(&self) -> UnconfirmedView {
        let records = match self.earliest_unconfirmed_index() {
            Some(last) => self.records[..=last].iter().rev().cloned().collect(),
            None => Vec::new(),
        };
        UnconfirmedView { records }
    }

    /// Full replacement array recording `disposition` for the record at `key`
    ///
    /// A dispute also resets every record ending after the disputed one:
    /// a later period cannot stay certified while an earlier one is wrong.
    pub fn apply_disposition(
        &self,
        key: &PeriodKey,
        disposition: Disposition,
    ) -> Result<Vec<VerifiableRecord>, RecordError> {
        let target_end = self
            .records
            .iter()
            .find(|r| r.matches(key))
            .map(|r| r.period_end)
            .ok_or(RecordError::UnknownPeriod(*key))?;

        Ok(self
            .records
            .iter()
            .map(|record| {
                if record.matches(key) {
                    record.clone().with_disposition(disposition)
                } else if disposition.is_disputed() && record.period_end > target_end {
                    record.clone().with_disposition(Disposition::Unset)
                } else {
                    record.clone()
                }
            })
            .collect())
    }

    /// Full replacement array with every disposition reset
    #[must_use]
    pub fn cleared(&self) -> Vec<VerifiableRecord> {
        self.records
            .iter()
            .map(|record| record.clone().with_disposition(Disposition::Unset))
            .collect()
    }

    fn is_past_watermark(&self, record: &VerifiableRecord) -> bool {
        self.watermark.map_or(true, |mark| record.period_end > mark)
    }
}

/// Records past the watermark, earliest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnconfirmedView {
    records: Vec<VerifiableRecord>,
}

impl UnconfirmedView {
    /// Number of records to review
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing needs review
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a view position
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&VerifiableRecord> {
        self.records.get(index)
    }

    /// All records, earliest first
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[VerifiableRecord] {
        &self.records
    }

    /// Iterate records, earliest first
    pub fn iter(&self) -> impl Iterator<Item = &VerifiableRecord> {
        self.records.iter()
    }

    /// View position of the record addressed by `key`
    #[must_use]
    pub fn position(&self, key: &PeriodKey) -> Option<usize> {
        self.records.iter().position(|r| r.matches(key))
    }

    /// Earliest disputed record, with its view position
    #[must_use]
    pub fn first_disputed(&self) -> Option<(usize, &VerifiableRecord)> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, r)| r.disposition.is_disputed())
    }
}
