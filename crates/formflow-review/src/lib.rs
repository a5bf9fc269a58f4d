//! Formflow Review - Sequential Review State Machine
//!
//! Walks the unconfirmed records one at a time, collects a disposition for
//! each, lets the user step back or jump in to correct an earlier verdict,
//! and ends in a terminal review phase from which the full set is submitted.
//!
//! The machine never writes the record store. Every transition returns an
//! [`Outcome`] plus a list of [`Effect`] descriptors; the caller applies them
//! in order and hands the refreshed [`RecordSnapshot`] back.
//!
//! # Example
//!
//! ```rust,ignore
//! use formflow_review::{Effect, ReviewMachine};
//! use formflow_records::Disposition;
//!
//! let mut machine = ReviewMachine::new(snapshot);
//! machine.select(Disposition::Confirmed)?;
//! let transition = machine.advance()?;
//! for effect in transition.effects {
//!     if let Effect::PersistDispositions(records) = effect {
//!         store.update_dispositions(records);
//!         machine.replace_snapshot(store.unverified_records());
//!     }
//! }
//! ```
//!
//! [`RecordSnapshot`]: formflow_records::RecordSnapshot

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod cursor;
pub mod effect;
pub mod error;
pub mod machine;
pub mod phase;
pub mod submission;
pub mod view;

// Re-exports for convenience
pub use cursor::ReviewCursor;
pub use effect::{Destination, Effect, Outcome, Transition};
pub use error::ReviewError;
pub use machine::ReviewMachine;
pub use phase::{permitted_intents, validate_intent, IntentKind, PhaseKind, ReviewIntent, ReviewPhase};
pub use submission::{SubmissionError, SubmissionPayload, SubmissionReceipt, SubmittedRecord};
pub use view::{Progress, ReviewView};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check if running with strict debugging enabled
pub const fn strict_debug() -> bool {
    cfg!(feature = "strict-debug")
}
