//! Ephemeral restart markers
//!
//! A keyed store (session-scoped in a browser) holding the
//! restart-in-progress flag that keeps a resume from racing a deletion.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Value written while a restart is in progress
pub const RESTART_MARKER_VALUE: &str = "restarting";

/// Keyed ephemeral marker storage
pub trait RestartMarkerStore: Send + Sync {
    /// Set the marker at `key`
    fn set_marker(&self, key: &str, value: &str);
    /// Read the marker at `key`
    fn get_marker(&self, key: &str) -> Option<String>;
    /// Remove the marker at `key`
    fn clear_marker(&self, key: &str);

    /// Whether a restart is recorded at `key`
    fn is_restarting(&self, key: &str) -> bool {
        self.get_marker(key).as_deref() == Some(RESTART_MARKER_VALUE)
    }
}

impl<T: RestartMarkerStore + ?Sized> RestartMarkerStore for Arc<T> {
    fn set_marker(&self, key: &str, value: &str) {
        (**self).set_marker(key, value);
    }

    fn get_marker(&self, key: &str) -> Option<String> {
        (**self).get_marker(key)
    }

    fn clear_marker(&self, key: &str) {
        (**self).clear_marker(key);
    }
}

/// Process-local marker store
#[derive(Debug, Default)]
pub struct InMemoryMarkerStore {
    markers: RwLock<HashMap<String, String>>,
}

impl InMemoryMarkerStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of markers held
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.read().len()
    }

    /// Whether no markers are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.read().is_empty()
    }
}

impl RestartMarkerStore for InMemoryMarkerStore {
    fn set_marker(&self, key: &str, value: &str) {
        self.markers.write().insert(key.to_string(), value.to_string());
    }

    fn get_marker(&self, key: &str) -> Option<String> {
        self.markers.read().get(key).cloned()
    }

    fn clear_marker(&self, key: &str) {
        self.markers.write().remove(key);
    }
}
