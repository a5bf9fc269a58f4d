//! Configuration for Formflow drivers
//!
//! Loaded from TOML. Every section has defaults, so an empty document is a
//! valid configuration.

use formflow_review::Destination;
use formflow_session::FormConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration document is not valid TOML for this schema
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable
    #[error("invalid configuration: {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormflowConfig {
    /// Session controller settings
    pub form: FormConfig,
    /// Review route table
    pub routes: RouteTable,
    /// Logging settings
    pub telemetry: TelemetryConfig,
}

impl FormflowConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }

    /// Check the values the drivers depend on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.form.form_id.trim().is_empty() {
            return Err(invalid("form.form_id", "must not be empty"));
        }
        if self.form.restart_storage_key.trim().is_empty() {
            return Err(invalid("form.restart_storage_key", "must not be empty"));
        }
        check_route("form.start_page", &self.form.start_page)?;
        if let Some(destination) = &self.form.restart_destination {
            check_route("form.restart_destination", destination)?;
        }
        check_route("routes.landing", &self.routes.landing)?;
        check_route("routes.submission_succeeded", &self.routes.submission_succeeded)?;
        check_route("routes.submission_failed", &self.routes.submission_failed)?;
        check_route("routes.sign_in", &self.routes.sign_in)?;
        Ok(())
    }
}

/// Routes the review driver navigates to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    pub landing: String,
    pub submission_succeeded: String,
    pub submission_failed: String,
    pub sign_in: String,
}

impl RouteTable {
    /// Route for a review destination
    #[must_use]
    pub fn resolve(&self, destination: Destination) -> &str {
        match destination {
            Destination::Landing => &self.landing,
            Destination::SubmissionSucceeded => &self.submission_succeeded,
            Destination::SubmissionFailed => &self.submission_failed,
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            landing: "/review-enrollments".to_string(),
            submission_succeeded: "/review-enrollments".to_string(),
            submission_failed: "/verify-enrollments-error".to_string(),
            sign_in: "/".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_route(field: &'static str, route: &str) -> Result<(), ConfigError> {
    if route.starts_with('/') {
        Ok(())
    } else {
        Err(invalid(field, format!("route {route:?} must start with '/'")))
    }
}
