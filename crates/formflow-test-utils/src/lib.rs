//! Testing utilities for Formflow workspace
//!
//! Shared record builders and canned snapshots.

#![allow(missing_docs)]

use chrono::{Datelike, NaiveDate};
use formflow_records::{Disposition, RecordSnapshot, VerifiableRecord};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Calendar-month record, e.g. "March 2024"
pub fn month_record(year: i32, month: u32) -> VerifiableRecord {
    let start = date(year, month, 1);
    let next = if month == 12 {
        date(year + 1, 1, 1)
    } else {
        date(year, month + 1, 1)
    };
    let end = next.pred_opt().unwrap();
    let label = format!("{} {}", start.format("%B"), start.year());
    VerifiableRecord::new(start, end, label)
}

/// `count` consecutive months of 2024 starting in January, earliest first
pub fn months_2024(count: u32) -> Vec<VerifiableRecord> {
    (1..=count).map(|m| month_record(2024, m)).collect()
}

/// Reorder earliest-first records into the store's newest-first order
pub fn newest_first(mut records: Vec<VerifiableRecord>) -> Vec<VerifiableRecord> {
    records.reverse();
    records
}

/// Watermark that leaves every 2024 month unconfirmed
pub fn watermark_before_2024() -> Option<NaiveDate> {
    Some(date(2023, 12, 31))
}

/// Three unconfirmed months (January to March 2024), nothing recorded
pub fn three_month_snapshot() -> RecordSnapshot {
    RecordSnapshot::new(newest_first(months_2024(3)), watermark_before_2024())
}

/// Unconfirmed 2024 months with the given dispositions, earliest first
pub fn snapshot_with(dispositions: &[Disposition]) -> RecordSnapshot {
    let count = u32::try_from(dispositions.len()).unwrap();
    let records = months_2024(count)
        .into_iter()
        .zip(dispositions)
        .map(|(record, &d)| record.with_disposition(d))
        .collect();
    RecordSnapshot::new(newest_first(records), watermark_before_2024())
}
