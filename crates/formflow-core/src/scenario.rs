//! Scripted review scenarios
//!
//! A scenario is a JSON document holding the store's records, the watermark,
//! a list of user events and the submission service's scripted answers.
//! [`replay`] runs it through a [`ReviewSession`] over in-memory adapters.

use crate::config::RouteTable;
use crate::error::FormflowError;
use crate::memory::{InMemoryRecordStore, RecordingNavigator, ScriptedGateway};
use crate::ports::RecordStore;
use crate::review_session::ReviewSession;
use chrono::NaiveDate;
use formflow_records::{Disposition, PeriodKey, RecordSnapshot, VerifiableRecord};
use formflow_review::{Outcome, Progress, ReviewPhase, SubmissionError, SubmissionPayload, SubmissionReceipt};
use formflow_session::SessionMetadata;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// One user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Select { disposition: Disposition },
    Advance,
    Retreat,
    JumpToEdit {
        period_start: NaiveDate,
        period_end: NaiveDate,
    },
    FinishLater,
    Submit,
}

/// Scripted answer from the submission service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ScriptedResponse {
    Accept {
        #[serde(default)]
        confirmation_id: Option<String>,
    },
    Reject { reason: String },
    Transport { reason: String },
}

impl From<ScriptedResponse> for Result<SubmissionReceipt, SubmissionError> {
    fn from(response: ScriptedResponse) -> Self {
        match response {
            ScriptedResponse::Accept { confirmation_id } => Ok(SubmissionReceipt { confirmation_id }),
            ScriptedResponse::Reject { reason } => Err(SubmissionError::Rejected(reason)),
            ScriptedResponse::Transport { reason } => Err(SubmissionError::Transport(reason)),
        }
    }
}

/// Scenario document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "SessionMetadata::signed_in")]
    pub metadata: SessionMetadata,
    /// Records in store order (newest first)
    pub records: Vec<VerifiableRecord>,
    #[serde(default)]
    pub watermark: Option<NaiveDate>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
    #[serde(default)]
    pub submissions: Vec<ScriptedResponse>,
}

impl Scenario {
    pub fn from_json(document: &str) -> Result<Self, FormflowError> {
        serde_json::from_str(document).map_err(|e| FormflowError::Scenario(e.to_string()))
    }
}

/// State after one replayed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayStep {
    pub event: ScenarioEvent,
    pub outcome: Outcome,
    pub phase: ReviewPhase,
    pub progress: Progress,
    pub title: String,
}

/// Everything a replay observed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub initial_phase: ReviewPhase,
    pub steps: Vec<ReplayStep>,
    pub routes: Vec<String>,
    pub final_records: Vec<VerifiableRecord>,
    pub submitted: Vec<SubmissionPayload>,
}

/// Run a scenario to completion
///
/// Stops at the first event the review rejects as out of contract.
pub async fn replay(scenario: Scenario, routes: RouteTable) -> Result<ReplayReport, FormflowError> {
    let store = Arc::new(InMemoryRecordStore::new(RecordSnapshot::new(
        scenario.records,
        scenario.watermark,
    )));
    let navigator = Arc::new(RecordingNavigator::new());
    let gateway = Arc::new(ScriptedGateway::scripted(
        scenario.submissions.into_iter().map(Into::into),
    ));

    let mut session = ReviewSession::open(
        Arc::clone(&store),
        Arc::clone(&navigator),
        Arc::clone(&gateway),
        routes,
        &scenario.metadata,
    )?;
    let initial_phase = session.phase();

    let mut steps = Vec::with_capacity(scenario.events.len());
    for event in scenario.events {
        let outcome = match &event {
            ScenarioEvent::Select { disposition } => session.select(*disposition)?,
            ScenarioEvent::Advance => session.advance()?,
            ScenarioEvent::Retreat => session.retreat()?,
            ScenarioEvent::JumpToEdit {
                period_start,
                period_end,
            } => session.jump_to_edit(PeriodKey::new(*period_start, *period_end))?,
            ScenarioEvent::FinishLater => session.finish_later()?,
            ScenarioEvent::Submit => session.submit().await?,
        };
        let view = session.view();
        debug!(?event, ?outcome, phase = ?view.phase, "replayed event");
        steps.push(ReplayStep {
            event,
            outcome,
            phase: view.phase,
            progress: view.progress,
            title: view.title_postfix,
        });
    }

    Ok(ReplayReport {
        initial_phase,
        steps,
        routes: navigator.routes(),
        final_records: store.unverified_records().records().to_vec(),
        submitted: gateway.received(),
    })
}
