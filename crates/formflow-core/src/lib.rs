//! Formflow Core
//!
//! Wires the session controller and the review state machine to the outside
//! world:
//! - [`EntryFlow`] runs the session controller and performs its navigation
//! - [`ReviewSession`] applies review effects against the record store,
//!   navigator and submission gateway, strictly in emission order
//! - [`FormflowConfig`] loads form, route and telemetry settings from TOML
//! - [`memory`] holds in-process implementations of every port
//!
//! # Example
//!
//! ```rust,ignore
//! use formflow_core::prelude::*;
//!
//! # async fn example() -> Result<(), FormflowError> {
//! let config = FormflowConfig::load("formflow.toml")?;
//! let mut review = ReviewSession::open(store, navigator, gateway, config.routes.clone(), &metadata)?;
//!
//! review.select(Disposition::Confirmed)?;
//! review.advance()?;
//! review.submit().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod entry;
pub mod error;
pub mod memory;
pub mod ports;
pub mod review_session;
pub mod scenario;
pub mod telemetry;

// Re-exports for convenience
pub use config::{ConfigError, FormflowConfig, RouteTable, TelemetryConfig};
pub use entry::{EntryFlow, EntryOutcome};
pub use error::FormflowError;
pub use ports::{Navigator, RecordStore, SubmissionGateway};
pub use review_session::ReviewSession;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Formflow
    pub use crate::{
        EntryFlow, EntryOutcome, FormflowConfig, FormflowError, Navigator, RecordStore,
        ReviewSession, RouteTable, SubmissionGateway,
    };
    pub use formflow_records::{Disposition, PeriodKey, RecordSnapshot, VerifiableRecord};
    pub use formflow_review::{Outcome, ReviewPhase, ReviewView};
    pub use formflow_session::{FormConfig, SessionIntent, SessionMetadata};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
