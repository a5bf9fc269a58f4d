//! Per-form configuration for the session controller

use serde::{Deserialize, Serialize};

const DEFAULT_START_NEW_TEXT: &str = "Start a new application";
const DEFAULT_CONTINUE_TEXT: &str = "Continue your application";
const DEFAULT_START_OVER_TEXT: &str = "Start over";

/// Form configuration consumed by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Form identifier passed to the persistence service
    pub form_id: String,
    /// First page of the form
    pub start_page: String,
    /// Key of the ephemeral restart marker
    pub restart_storage_key: String,
    /// Where to go after a confirmed restart (defaults to `start_page`)
    pub restart_destination: Option<String>,
    /// Only offer "continue" for a saved form, never "start over"
    pub resume_only: bool,
    /// Button label overrides
    pub custom_text: CustomText,
}

impl FormConfig {
    /// Create configuration for a form
    #[inline]
    #[must_use]
    pub fn new(form_id: impl Into<String>, start_page: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            start_page: start_page.into(),
            ..Self::default()
        }
    }

    /// With a restart destination
    #[inline]
    #[must_use]
    pub fn with_restart_destination(mut self, destination: impl Into<String>) -> Self {
        self.restart_destination = Some(destination.into());
        self
    }

    /// With resume-only mode
    #[inline]
    #[must_use]
    pub fn with_resume_only(mut self, resume_only: bool) -> Self {
        self.resume_only = resume_only;
        self
    }

    /// Destination after a confirmed restart
    #[must_use]
    pub fn restart_target(&self) -> &str {
        self.restart_destination
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.start_page)
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: "form".to_string(),
            start_page: "/introduction".to_string(),
            restart_storage_key: "wizard-status".to_string(),
            restart_destination: None,
            resume_only: false,
            custom_text: CustomText::default(),
        }
    }
}

/// Button label overrides; empty strings fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomText {
    pub start_new_app_button_text: Option<String>,
    pub continue_app_button_text: Option<String>,
    pub start_over_button_text: Option<String>,
}

impl CustomText {
    #[must_use]
    pub fn start_new(&self) -> &str {
        pick(self.start_new_app_button_text.as_deref(), DEFAULT_START_NEW_TEXT)
    }

    #[must_use]
    pub fn continue_app(&self) -> &str {
        pick(self.continue_app_button_text.as_deref(), DEFAULT_CONTINUE_TEXT)
    }

    #[must_use]
    pub fn start_over(&self) -> &str {
        pick(self.start_over_button_text.as_deref(), DEFAULT_START_OVER_TEXT)
    }
}

fn pick<'a>(custom: Option<&'a str>, fallback: &'a str) -> &'a str {
    custom.filter(|text| !text.trim().is_empty()).unwrap_or(fallback)
}
