//! Per-record verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

/// The user's confirm/dispute verdict on a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// No verdict recorded yet
    #[default]
    Unset,
    /// The record's information is correct
    Confirmed,
    /// The record's information is incorrect
    Disputed,
}

impl Disposition {
    /// Whether a verdict has been chosen
    #[inline]
    #[must_use]
    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Whether this verdict disputes the record
    #[inline]
    #[must_use]
    pub fn is_disputed(self) -> bool {
        matches!(self, Self::Disputed)
    }

    /// Stable identifier used in logs and payloads
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Confirmed => "confirmed",
            Self::Disputed => "disputed",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
