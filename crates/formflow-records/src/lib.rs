//! Formflow Records
//!
//! Dated, status-tagged records that a user confirms one at a time.
//!
//! # Core Concepts
//!
//! - [`VerifiableRecord`]: One period to be confirmed or disputed
//! - [`PeriodKey`]: Immutable `(period_start, period_end)` identity of a record
//! - [`Disposition`]: The user's verdict on a record
//! - [`RecordSnapshot`]: Immutable copy of the record store plus its watermark
//! - [`UnconfirmedView`]: The records past the watermark, earliest first
//!
//! # Example
//!
//! ```rust,ignore
//! use formflow_records::{RecordSnapshot, VerifiableRecord};
//!
//! let snapshot = RecordSnapshot::new(records, Some(watermark));
//! let view = snapshot.unconfirmed();
//! println!("{} periods to review", view.len());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod disposition;
mod record;
mod snapshot;

// Re-exports
pub use disposition::Disposition;
pub use record::{PeriodKey, VerifiableRecord};
pub use snapshot::{RecordError, RecordSnapshot, UnconfirmedView};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
