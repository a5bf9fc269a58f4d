//! Formflow Session - Resumable Session Controller
//!
//! Decides, at form entry, whether to start fresh, resume a saved form, or
//! confirm a destructive restart, and carries out the chosen path against
//! the progress-persistence service.
//!
//! # Example
//!
//! ```rust,ignore
//! use formflow_session::{FormConfig, InMemoryMarkerStore, SessionController, SessionIntent};
//!
//! # async fn example(persistence: impl formflow_session::ProgressPersistence) -> Result<(), Box<dyn std::error::Error>> {
//! let mut controller = SessionController::new(FormConfig::default(), persistence, InMemoryMarkerStore::new());
//!
//! match controller.activate(metadata) {
//!     SessionIntent::Resume => { let outcome = controller.resume().await?; }
//!     SessionIntent::StartNew { .. } => { let outcome = controller.start_new().await?; }
//!     SessionIntent::RestartConfirm { .. } => { /* show the confirmation dialog */ }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod controller;
pub mod controls;
pub mod error;
pub mod marker;
pub mod metadata;
pub mod persistence;

// Re-exports for convenience
pub use config::{CustomText, FormConfig};
pub use controller::{
    ControllerPhase, RestartOutcome, ResumeOutcome, SessionController, SessionIntent, StartOutcome,
};
pub use controls::{StartButton, StartChoice, StartControls};
pub use error::SessionError;
pub use marker::{InMemoryMarkerStore, RestartMarkerStore, RESTART_MARKER_VALUE};
pub use metadata::SessionMetadata;
pub use persistence::{PersistenceError, ProgressPersistence};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
