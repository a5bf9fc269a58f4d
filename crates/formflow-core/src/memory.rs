//! In-process implementations of every port
//!
//! Used by the simulator binary and the integration tests. Each adapter keeps
//! an ordered journal of what was asked of it.

use crate::ports::{Navigator, RecordStore, SubmissionGateway};
use async_trait::async_trait;
use formflow_records::{RecordSnapshot, VerifiableRecord};
use formflow_review::{SubmissionError, SubmissionPayload, SubmissionReceipt};
use formflow_session::{PersistenceError, ProgressPersistence};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};

pub use formflow_session::InMemoryMarkerStore;

/// Record store backed by a snapshot behind a lock
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    snapshot: RwLock<RecordSnapshot>,
    writes: Mutex<Vec<Vec<VerifiableRecord>>>,
}

impl InMemoryRecordStore {
    /// Create store holding `snapshot`
    #[must_use]
    pub fn new(snapshot: RecordSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every array written, oldest first
    #[must_use]
    pub fn writes(&self) -> Vec<Vec<VerifiableRecord>> {
        self.writes.lock().clone()
    }

    /// Number of writes
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn unverified_records(&self) -> RecordSnapshot {
        self.snapshot.read().clone()
    }

    fn update_dispositions(&self, records: Vec<VerifiableRecord>) {
        let mut snapshot = self.snapshot.write();
        *snapshot = RecordSnapshot::new(records.clone(), snapshot.watermark());
        self.writes.lock().push(records);
    }
}

/// Something the navigator was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Navigate(String),
    ScrollToTop,
}

/// Navigator that only records
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events, oldest first
    #[must_use]
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().clone()
    }

    /// Routes navigated to, oldest first
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Navigate(route) => Some(route.clone()),
                NavigationEvent::ScrollToTop => None,
            })
            .collect()
    }

    /// Most recent route
    #[must_use]
    pub fn last_route(&self) -> Option<String> {
        self.routes().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.events
            .lock()
            .push(NavigationEvent::Navigate(route.to_string()));
    }

    fn scroll_to_top(&self) {
        self.events.lock().push(NavigationEvent::ScrollToTop);
    }
}

/// Gateway answering from a script; accepts once the script runs out
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Result<SubmissionReceipt, SubmissionError>>>,
    received: Mutex<Vec<SubmissionPayload>>,
}

impl ScriptedGateway {
    /// Gateway that accepts everything
    #[must_use]
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Gateway answering with `responses` in order
    #[must_use]
    pub fn scripted(
        responses: impl IntoIterator<Item = Result<SubmissionReceipt, SubmissionError>>,
    ) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Payloads received, oldest first
    #[must_use]
    pub fn received(&self) -> Vec<SubmissionPayload> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl SubmissionGateway for ScriptedGateway {
    async fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.received.lock().push(payload);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(SubmissionReceipt::default()))
    }
}

/// Progress persistence over a map of saved forms
///
/// A saved form maps to its return URL, if it has one.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    saved: RwLock<HashMap<String, Option<String>>>,
    fetch_failure: RwLock<Option<PersistenceError>>,
    fetches: Mutex<Vec<(String, bool)>>,
    removals: Mutex<Vec<String>>,
}

impl InMemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a saved form
    #[must_use]
    pub fn with_saved(self, form_id: impl Into<String>, return_url: Option<&str>) -> Self {
        self.saved
            .write()
            .insert(form_id.into(), return_url.map(str::to_string));
        self
    }

    /// Every fetch fails with `error`
    #[must_use]
    pub fn failing_fetch(self, error: PersistenceError) -> Self {
        *self.fetch_failure.write() = Some(error);
        self
    }

    /// Whether a saved form exists
    #[must_use]
    pub fn has_saved(&self, form_id: &str) -> bool {
        self.saved.read().contains_key(form_id)
    }

    /// Fetch calls as `(form_id, prefill)`, oldest first
    #[must_use]
    pub fn fetches(&self) -> Vec<(String, bool)> {
        self.fetches.lock().clone()
    }

    /// Removal calls, oldest first
    #[must_use]
    pub fn removals(&self) -> Vec<String> {
        self.removals.lock().clone()
    }
}

#[async_trait]
impl ProgressPersistence for InMemoryPersistence {
    async fn fetch_in_progress(
        &self,
        form_id: &str,
        prefill: bool,
    ) -> Result<Option<String>, PersistenceError> {
        self.fetches.lock().push((form_id.to_string(), prefill));
        if let Some(err) = self.fetch_failure.read().clone() {
            return Err(err);
        }
        if prefill {
            return Ok(None);
        }
        self.saved
            .read()
            .get(form_id)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(form_id.to_string()))
    }

    async fn remove_in_progress(&self, form_id: &str) -> Result<(), PersistenceError> {
        self.removals.lock().push(form_id.to_string());
        self.saved.write().remove(form_id);
        Ok(())
    }
}
