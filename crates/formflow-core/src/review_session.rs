//! Review driver
//!
//! Feeds intents into a [`ReviewMachine`] and applies the returned effects in
//! emission order: persisted arrays go to the [`RecordStore`] and the
//! refreshed snapshot goes straight back into the machine before the next
//! effect runs; scrolls and routes go to the [`Navigator`]; the submission
//! payload goes to the [`SubmissionGateway`].

use crate::config::RouteTable;
use crate::error::FormflowError;
use crate::ports::{Navigator, RecordStore, SubmissionGateway};
use formflow_records::{Disposition, PeriodKey};
use formflow_review::{
    Effect, Outcome, ReviewMachine, ReviewPhase, ReviewView, SubmissionPayload, Transition,
};
use formflow_session::SessionMetadata;
use tracing::{debug, info, warn};

/// One user's pass over the unconfirmed records
#[derive(Debug)]
pub struct ReviewSession<S, N, G> {
    machine: ReviewMachine,
    store: S,
    navigator: N,
    gateway: G,
    routes: RouteTable,
}

impl<S, N, G> ReviewSession<S, N, G>
where
    S: RecordStore,
    N: Navigator,
    G: SubmissionGateway,
{
    /// Open a review over the store's current records
    ///
    /// A signed-out user is sent to the sign-in route instead.
    pub fn open(
        store: S,
        navigator: N,
        gateway: G,
        routes: RouteTable,
        metadata: &SessionMetadata,
    ) -> Result<Self, FormflowError> {
        if !metadata.is_logged_in {
            warn!(route = %routes.sign_in, "review requires sign-in");
            navigator.navigate(&routes.sign_in);
            return Err(FormflowError::NotSignedIn);
        }

        let machine = ReviewMachine::try_new(store.unverified_records())?;
        info!(
            records = machine.unconfirmed().len(),
            phase = ?machine.phase(),
            "review opened"
        );
        Ok(Self {
            machine,
            store,
            navigator,
            gateway,
            routes,
        })
    }

    pub fn select(&mut self, disposition: Disposition) -> Result<Outcome, FormflowError> {
        let transition = self.machine.select(disposition)?;
        Ok(self.apply(transition))
    }

    pub fn advance(&mut self) -> Result<Outcome, FormflowError> {
        let transition = self.machine.advance()?;
        Ok(self.apply(transition))
    }

    pub fn retreat(&mut self) -> Result<Outcome, FormflowError> {
        let transition = self.machine.retreat()?;
        Ok(self.apply(transition))
    }

    pub fn jump_to_edit(&mut self, key: PeriodKey) -> Result<Outcome, FormflowError> {
        let transition = self.machine.jump_to_edit(key)?;
        Ok(self.apply(transition))
    }

    pub fn finish_later(&mut self) -> Result<Outcome, FormflowError> {
        let transition = self.machine.finish_later()?;
        Ok(self.apply(transition))
    }

    /// Submit the verdict set and wait for the service
    ///
    /// A submit while one is in flight or already accepted is ignored.
    /// Failures are not retried; the terminal review stays open.
    pub async fn submit(&mut self) -> Result<Outcome, FormflowError> {
        let transition = self.machine.submit()?;
        let outcome = transition.outcome;
        let Some(payload) = self.apply_collecting(transition) else {
            return Ok(outcome);
        };

        let result = self.gateway.submit(payload).await;
        let settled = self.machine.complete_submission(result)?;
        Ok(self.apply(settled))
    }

    /// Reload the machine from the store after an outside change
    pub fn refresh(&mut self) {
        self.machine.replace_snapshot(self.store.unverified_records());
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> ReviewPhase {
        self.machine.phase()
    }

    /// Render state for the current step
    #[must_use]
    pub fn view(&self) -> ReviewView {
        self.machine.view()
    }

    #[inline]
    #[must_use]
    pub fn machine(&self) -> &ReviewMachine {
        &self.machine
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    #[inline]
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn apply(&mut self, transition: Transition) -> Outcome {
        let outcome = transition.outcome;
        if let Some(payload) = self.apply_collecting(transition) {
            warn!(records = payload.records.len(), "submission effect outside submit dropped");
        }
        outcome
    }

    fn apply_collecting(&mut self, transition: Transition) -> Option<SubmissionPayload> {
        let mut pending = None;
        for effect in transition.effects {
            match effect {
                Effect::PersistDispositions(records) => {
                    debug!(records = records.len(), "persisting dispositions");
                    self.store.update_dispositions(records);
                    self.refresh();
                }
                Effect::ScrollToTop => self.navigator.scroll_to_top(),
                Effect::Submit(payload) => pending = Some(payload),
                Effect::Navigate(destination) => {
                    let route = self.routes.resolve(destination);
                    debug!(?destination, route, "navigating");
                    self.navigator.navigate(route);
                }
            }
        }
        pending
    }
}
