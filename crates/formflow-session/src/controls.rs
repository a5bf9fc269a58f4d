//! Entry-screen choices derived from session metadata

use crate::config::FormConfig;
use crate::metadata::SessionMetadata;
use serde::Serialize;

/// What a start-screen button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartChoice {
    /// Start a fresh form
    StartNew,
    /// Resume the saved form
    Continue,
    /// Discard the saved form (opens the confirmation dialog)
    StartOver,
}

/// A labelled start-screen button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartButton {
    pub choice: StartChoice,
    pub label: String,
}

/// The set of choices offered at form entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartControls {
    /// Main call to action
    pub primary: StartButton,
    /// Alternate action, if any
    pub secondary: Option<StartButton>,
    /// Whether a destructive confirmation dialog (confirm + cancel) is attached
    pub confirmation_dialog: bool,
}

impl StartControls {
    /// Derive controls for the given metadata
    #[must_use]
    pub fn derive(config: &FormConfig, metadata: &SessionMetadata) -> Self {
        let text = &config.custom_text;
        let button = |choice, label: &str| StartButton {
            choice,
            label: label.to_string(),
        };

        if metadata.has_expired_form() {
            return Self {
                primary: button(StartChoice::StartNew, text.start_new()),
                secondary: None,
                confirmation_dialog: true,
            };
        }

        if metadata.has_resumable_form() {
            let secondary =
                (!config.resume_only).then(|| button(StartChoice::StartOver, text.start_over()));
            return Self {
                primary: button(StartChoice::Continue, text.continue_app()),
                confirmation_dialog: secondary.is_some(),
                secondary,
            };
        }

        Self {
            primary: button(StartChoice::StartNew, text.start_new()),
            secondary: None,
            confirmation_dialog: false,
        }
    }

    /// Total buttons rendered, dialog buttons included
    #[must_use]
    pub fn button_count(&self) -> usize {
        1 + usize::from(self.secondary.is_some()) + if self.confirmation_dialog { 2 } else { 0 }
    }
}
