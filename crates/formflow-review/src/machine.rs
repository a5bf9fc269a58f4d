//! Sequential Review State Machine
//!
//! Owns the [`ReviewCursor`] and reads, but never writes, the record
//! snapshot. Dispositions reach the store only through
//! [`Effect::PersistDispositions`], and the caller feeds the refreshed
//! snapshot back through [`ReviewMachine::replace_snapshot`].
//!
//! An outstanding dispute outranks ordinary navigation: outside edit mode
//! the machine shows the terminal review, and stepping back from it reopens
//! the disputed record.

use crate::cursor::ReviewCursor;
use crate::effect::{Destination, Effect, Outcome, Transition};
use crate::error::ReviewError;
use crate::phase::{validate_intent, IntentKind, ReviewIntent, ReviewPhase};
use crate::submission::{SubmissionError, SubmissionPayload, SubmissionReceipt};
use crate::view::{verify_title, Progress, ReviewView, REVIEW_TITLE};
use formflow_records::{Disposition, PeriodKey, RecordSnapshot, UnconfirmedView, VerifiableRecord};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitStatus {
    Idle,
    InFlight,
    Accepted,
}

/// Review state machine over one record snapshot
#[derive(Debug, Clone)]
pub struct ReviewMachine {
    snapshot: RecordSnapshot,
    view: UnconfirmedView,
    cursor: ReviewCursor,
    submit: SubmitStatus,
    exited: bool,
}

impl ReviewMachine {
    /// Start a review
    ///
    /// An unresolved dispute reopens that record in edit mode; an empty view
    /// starts in terminal review.
    #[must_use]
    pub fn new(snapshot: RecordSnapshot) -> Self {
        let view = snapshot.unconfirmed();
        let cursor = match view.first_disputed() {
            Some((index, record)) => {
                ReviewCursor::editing_at(index, record.disposition, Some(record.key()))
            }
            None => ReviewCursor {
                pending_disposition: view
                    .get(0)
                    .map_or(Disposition::Unset, |r| r.disposition),
                ..ReviewCursor::default()
            },
        };

        let machine = Self {
            snapshot,
            view,
            cursor,
            submit: SubmitStatus::Idle,
            exited: false,
        };
        debug!(records = machine.view.len(), phase = ?machine.phase(), "review started");
        machine
    }

    /// Start a review after checking the snapshot's periods
    pub fn try_new(snapshot: RecordSnapshot) -> Result<Self, ReviewError> {
        snapshot.validate()?;
        Ok(Self::new(snapshot))
    }

    /// Install a refreshed snapshot from the store
    ///
    /// In edit mode the cursor follows the edited record by key. The index is
    /// then clamped to the new view length.
    pub fn replace_snapshot(&mut self, snapshot: RecordSnapshot) {
        let editing_key = if self.cursor.editing {
            self.view.get(self.cursor.current_index).map(VerifiableRecord::key)
        } else {
            None
        };

        self.view = snapshot.unconfirmed();
        self.snapshot = snapshot;
        if let Some(index) = editing_key.and_then(|key| self.view.position(&key)) {
            self.cursor.current_index = index;
        }
        if self.cursor.current_index > self.view.len() {
            self.cursor.current_index = self.view.len();
        }
        debug!(records = self.view.len(), phase = ?self.phase(), "snapshot replaced");
    }

    /// Current phase, derived from cursor, submission status and snapshot
    #[must_use]
    pub fn phase(&self) -> ReviewPhase {
        if self.exited {
            return ReviewPhase::Exited;
        }
        match self.submit {
            SubmitStatus::InFlight => return ReviewPhase::Submitting,
            SubmitStatus::Accepted => return ReviewPhase::Submitted,
            SubmitStatus::Idle => {}
        }

        let index = self.cursor.current_index;
        if !self.cursor.editing && (self.view.first_disputed().is_some() || index >= self.view.len())
        {
            ReviewPhase::TerminalReview
        } else {
            ReviewPhase::Reviewing {
                index,
                editing: self.cursor.editing,
            }
        }
    }

    /// Apply a user intent
    pub fn dispatch(&mut self, intent: ReviewIntent) -> Result<Transition, ReviewError> {
        validate_intent(self.phase().kind(), intent.kind())?;
        debug!(?intent, index = self.cursor.current_index, "applying intent");

        match intent {
            ReviewIntent::Select(disposition) => Ok(self.apply_select(disposition)),
            ReviewIntent::Advance => self.apply_advance(),
            ReviewIntent::Retreat => self.apply_retreat(),
            ReviewIntent::JumpToEdit(key) => self.enter_edit(&key),
            ReviewIntent::FinishLater => Ok(self.exit()),
            ReviewIntent::Submit => Ok(self.apply_submit()),
        }
    }

    /// Choose a verdict for the current record
    pub fn select(&mut self, disposition: Disposition) -> Result<Transition, ReviewError> {
        self.dispatch(ReviewIntent::Select(disposition))
    }

    /// Persist the pending verdict and move on
    pub fn advance(&mut self) -> Result<Transition, ReviewError> {
        self.dispatch(ReviewIntent::Advance)
    }

    /// Step back
    pub fn retreat(&mut self) -> Result<Transition, ReviewError> {
        self.dispatch(ReviewIntent::Retreat)
    }

    /// Reopen a record for editing
    pub fn jump_to_edit(&mut self, key: PeriodKey) -> Result<Transition, ReviewError> {
        self.dispatch(ReviewIntent::JumpToEdit(key))
    }

    /// Drop in-progress verdicts and leave
    pub fn finish_later(&mut self) -> Result<Transition, ReviewError> {
        self.dispatch(ReviewIntent::FinishLater)
    }

    /// Send the verdict set
    pub fn submit(&mut self) -> Result<Transition, ReviewError> {
        self.dispatch(ReviewIntent::Submit)
    }

    /// Record the submission service's answer
    pub fn complete_submission(
        &mut self,
        result: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<Transition, ReviewError> {
        validate_intent(self.phase().kind(), IntentKind::SettleSubmission)?;

        match result {
            Ok(receipt) => {
                self.submit = SubmitStatus::Accepted;
                info!(confirmation = ?receipt.confirmation_id, "verifications submitted");
                Ok(Transition::new(
                    Outcome::Submitted,
                    vec![Effect::Navigate(Destination::SubmissionSucceeded)],
                ))
            }
            Err(err) => {
                self.submit = SubmitStatus::Idle;
                warn!(error = %err, "verification submission failed");
                Ok(Transition::new(
                    Outcome::SubmitFailed,
                    vec![Effect::Navigate(Destination::SubmissionFailed)],
                ))
            }
        }
    }

    /// Cursor state
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> &ReviewCursor {
        &self.cursor
    }

    /// Snapshot the machine is reading
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &RecordSnapshot {
        &self.snapshot
    }

    /// Records under review, earliest first
    #[inline]
    #[must_use]
    pub fn unconfirmed(&self) -> &UnconfirmedView {
        &self.view
    }

    /// Record at the cursor, while reviewing
    #[must_use]
    pub fn current_record(&self) -> Option<&VerifiableRecord> {
        match self.phase() {
            ReviewPhase::Reviewing { index, .. } => self.view.get(index),
            _ => None,
        }
    }

    /// Earliest disputed record in the view
    #[must_use]
    pub fn disputed_record(&self) -> Option<&VerifiableRecord> {
        self.view.first_disputed().map(|(_, record)| record)
    }

    /// Payload the next submission would send
    #[must_use]
    pub fn submission_payload(&self) -> SubmissionPayload {
        SubmissionPayload::from_view(&self.view, self.snapshot.watermark())
    }

    /// Derived view state
    #[must_use]
    pub fn view(&self) -> ReviewView {
        let phase = self.phase();
        let total = self.view.len() + 1;
        let disputed = self.disputed_record().cloned();
        let current = self.current_record().cloned();

        let (segment, title_postfix) = match (&phase, &current) {
            (ReviewPhase::Reviewing { index, .. }, Some(record)) => {
                (index + 1, verify_title(record))
            }
            _ => (total, REVIEW_TITLE.to_string()),
        };

        let terminal = phase == ReviewPhase::TerminalReview;
        ReviewView {
            phase,
            pending_disposition: self.cursor.pending_disposition,
            progress: Progress { segment, total },
            title_postfix,
            show_selection_error: current.is_some() && self.cursor.continue_attempted,
            skipped_ahead: terminal
                && disputed.is_some()
                && self.cursor.current_index != self.view.len(),
            review_paused: disputed.is_some(),
            current,
            disputed,
        }
    }

    fn apply_select(&mut self, disposition: Disposition) -> Transition {
        self.cursor.pending_disposition = disposition;
        self.cursor.continue_attempted = false;
        Transition::quiet(Outcome::Selected)
    }

    fn apply_advance(&mut self) -> Result<Transition, ReviewError> {
        let index = self.cursor.current_index;
        let len = self.view.len();
        let record = self
            .view
            .get(index)
            .cloned()
            .ok_or(ReviewError::CursorOutOfRange { index, len })?;

        let chosen = self.cursor.pending_disposition;
        if !chosen.is_set() {
            self.cursor.continue_attempted = true;
            debug!(index, "advance without a verdict");
            return Ok(Transition::quiet(Outcome::ValidationFailed));
        }

        let key = record.key();
        let updated = self.snapshot.apply_disposition(&key, chosen)?;

        let last = index + 1 == len;
        if self.cursor.editing
            && (chosen.is_disputed() || last || self.cursor.edit_target == Some(key))
        {
            self.cursor.finish_edit();
        }
        self.cursor.current_index = index + 1;
        self.cursor.continue_attempted = false;
        self.cursor.pending_disposition = if last {
            Disposition::Unset
        } else {
            self.view
                .get(index + 1)
                .map_or(Disposition::Unset, |r| r.disposition)
        };

        debug!(index, disposition = %chosen, period = %key, "verdict recorded");
        Ok(Transition::new(
            Outcome::Moved,
            vec![Effect::PersistDispositions(updated), Effect::ScrollToTop],
        ))
    }

    fn apply_retreat(&mut self) -> Result<Transition, ReviewError> {
        let index = self.cursor.current_index;
        if index == 0 {
            return Ok(self.exit());
        }

        if !self.cursor.editing {
            if let Some(key) = self.disputed_record().map(VerifiableRecord::key) {
                return self.enter_edit(&key);
            }
        }

        let previous = index - 1;
        let pending = self
            .view
            .get(previous)
            .map(|r| r.disposition)
            .ok_or(ReviewError::CursorOutOfRange {
                index: previous,
                len: self.view.len(),
            })?;
        self.cursor.current_index = previous;
        self.cursor.pending_disposition = pending;
        self.cursor.continue_attempted = false;
        Ok(Transition::new(Outcome::Moved, vec![Effect::ScrollToTop]))
    }

    fn enter_edit(&mut self, key: &PeriodKey) -> Result<Transition, ReviewError> {
        let index = self
            .view
            .position(key)
            .ok_or(ReviewError::RecordNotFound(*key))?;
        let disposition = self.view.get(index).map_or(Disposition::Unset, |r| r.disposition);
        let target = disposition.is_disputed().then_some(*key);

        self.cursor = ReviewCursor::editing_at(index, disposition, target);
        debug!(index, period = %key, "editing record");
        Ok(Transition::new(Outcome::EnteredEdit, vec![Effect::ScrollToTop]))
    }

    fn exit(&mut self) -> Transition {
        let cleared = self.snapshot.cleared();
        self.cursor = ReviewCursor::default();
        self.exited = true;
        info!(records = cleared.len(), "review abandoned, verdicts cleared");
        Transition::new(
            Outcome::Exited,
            vec![
                Effect::PersistDispositions(cleared),
                Effect::Navigate(Destination::Landing),
            ],
        )
    }

    fn apply_submit(&mut self) -> Transition {
        if self.submit != SubmitStatus::Idle {
            warn!("submit ignored, submission already {:?}", self.submit);
            return Transition::quiet(Outcome::Ignored);
        }

        let payload = self.submission_payload();
        self.submit = SubmitStatus::InFlight;
        info!(
            records = payload.records.len(),
            disputed = payload.disputed_count(),
            "submitting verifications"
        );
        Transition::new(Outcome::SubmitStarted, vec![Effect::Submit(payload)])
    }
}

#[cfg(all(test, not(feature = "strict-debug")))]
mod tests {
    use super::*;
    use crate::phase::PhaseKind;
    use formflow_test_utils::{snapshot_with, three_month_snapshot};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Stand-in for the record store: apply persisted arrays and refresh
    fn settle(machine: &mut ReviewMachine, transition: &Transition) {
        if let Some(records) = transition.persisted() {
            let watermark = machine.snapshot().watermark();
            machine.replace_snapshot(RecordSnapshot::new(records.to_vec(), watermark));
        }
    }

    fn verdict(machine: &mut ReviewMachine, disposition: Disposition) -> Transition {
        machine.select(disposition).unwrap();
        let transition = machine.advance().unwrap();
        settle(machine, &transition);
        transition
    }

    fn key_at(machine: &ReviewMachine, index: usize) -> PeriodKey {
        machine.unconfirmed().get(index).unwrap().key()
    }

    #[test]
    fn empty_view_starts_in_terminal_review() {
        let machine = ReviewMachine::new(snapshot_with(&[]));
        assert_eq!(machine.phase(), ReviewPhase::TerminalReview);
        assert!(machine.current_record().is_none());
    }

    #[test]
    fn starts_at_first_record() {
        let machine = ReviewMachine::new(three_month_snapshot());
        assert_eq!(
            machine.phase(),
            ReviewPhase::Reviewing { index: 0, editing: false }
        );
        assert_eq!(machine.current_record().unwrap().label, "January 2024");
    }

    #[test]
    fn outstanding_dispute_reopens_in_edit_mode() {
        let machine = ReviewMachine::new(snapshot_with(&[
            Disposition::Confirmed,
            Disposition::Disputed,
            Disposition::Unset,
        ]));
        assert_eq!(
            machine.phase(),
            ReviewPhase::Reviewing { index: 1, editing: true }
        );
        assert_eq!(machine.cursor().pending_disposition, Disposition::Disputed);
    }

    #[test]
    fn advance_without_verdict_flags_validation() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        let transition = machine.advance().unwrap();

        assert_eq!(transition.outcome, Outcome::ValidationFailed);
        assert!(transition.effects.is_empty());
        assert_eq!(machine.cursor().current_index, 0);
        assert!(machine.cursor().continue_attempted);
        assert!(machine.view().show_selection_error);

        machine.select(Disposition::Confirmed).unwrap();
        assert!(!machine.cursor().continue_attempted);
    }

    #[test]
    fn confirming_every_record_reaches_terminal_review() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        for _ in 0..3 {
            verdict(&mut machine, Disposition::Confirmed);
        }

        assert_eq!(machine.phase(), ReviewPhase::TerminalReview);
        assert!(machine.disputed_record().is_none());
        assert!(machine
            .unconfirmed()
            .iter()
            .all(|r| r.disposition == Disposition::Confirmed));
    }

    #[test]
    fn dispute_short_circuits_to_terminal_review() {
        let mut machine = ReviewMachine::new(snapshot_with(&[
            Disposition::Unset,
            Disposition::Unset,
            Disposition::Confirmed,
        ]));
        verdict(&mut machine, Disposition::Confirmed);
        let transition = verdict(&mut machine, Disposition::Disputed);

        let persisted = transition.persisted().unwrap();
        let march = persisted.iter().find(|r| r.label == "March 2024").unwrap();
        assert_eq!(march.disposition, Disposition::Unset);

        assert_eq!(machine.phase(), ReviewPhase::TerminalReview);
        assert_eq!(machine.disputed_record().unwrap().label, "February 2024");

        let view = machine.view();
        assert!(view.skipped_ahead);
        assert!(view.review_paused);
    }

    #[test]
    fn retreat_from_first_record_clears_and_exits() {
        let mut machine = ReviewMachine::new(snapshot_with(&[
            Disposition::Confirmed,
            Disposition::Confirmed,
        ]));
        let transition = machine.retreat().unwrap();

        assert_eq!(transition.outcome, Outcome::Exited);
        assert!(transition
            .persisted()
            .unwrap()
            .iter()
            .all(|r| r.disposition == Disposition::Unset));
        assert_eq!(transition.effects.last(), Some(&Effect::Navigate(Destination::Landing)));
        assert_eq!(machine.phase(), ReviewPhase::Exited);
        assert!(machine.advance().is_err());
    }

    #[test]
    fn retreat_restores_previous_verdict() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        verdict(&mut machine, Disposition::Confirmed);
        machine.select(Disposition::Disputed).unwrap();

        let transition = machine.retreat().unwrap();
        assert_eq!(transition.outcome, Outcome::Moved);
        assert_eq!(machine.cursor().current_index, 0);
        assert_eq!(machine.cursor().pending_disposition, Disposition::Confirmed);
    }

    #[test]
    fn retreat_from_review_with_dispute_opens_disputed_record() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        verdict(&mut machine, Disposition::Confirmed);
        verdict(&mut machine, Disposition::Disputed);
        assert_eq!(machine.phase(), ReviewPhase::TerminalReview);

        let transition = machine.retreat().unwrap();
        assert_eq!(transition.outcome, Outcome::EnteredEdit);
        assert_eq!(
            machine.phase(),
            ReviewPhase::Reviewing { index: 1, editing: true }
        );
        assert_eq!(machine.cursor().pending_disposition, Disposition::Disputed);
    }

    #[test]
    fn retreat_from_completed_review_steps_to_last_record() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        for _ in 0..3 {
            verdict(&mut machine, Disposition::Confirmed);
        }
        machine.retreat().unwrap();
        assert_eq!(
            machine.phase(),
            ReviewPhase::Reviewing { index: 2, editing: false }
        );
    }

    #[test]
    fn resolving_dispute_resumes_sequential_review() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        verdict(&mut machine, Disposition::Confirmed);
        verdict(&mut machine, Disposition::Disputed);
        machine.retreat().unwrap();

        verdict(&mut machine, Disposition::Confirmed);
        assert!(!machine.cursor().editing);
        assert_eq!(
            machine.phase(),
            ReviewPhase::Reviewing { index: 2, editing: false }
        );
        assert!(machine.disputed_record().is_none());
    }

    #[test]
    fn jump_to_edit_from_terminal_review() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        for _ in 0..3 {
            verdict(&mut machine, Disposition::Confirmed);
        }
        let key = key_at(&machine, 0);
        machine.jump_to_edit(key).unwrap();

        assert_eq!(
            machine.phase(),
            ReviewPhase::Reviewing { index: 0, editing: true }
        );
        assert_eq!(machine.cursor().pending_disposition, Disposition::Confirmed);

        verdict(&mut machine, Disposition::Confirmed);
        assert!(machine.cursor().editing);
        verdict(&mut machine, Disposition::Confirmed);
        verdict(&mut machine, Disposition::Confirmed);
        assert!(!machine.cursor().editing);
        assert_eq!(machine.phase(), ReviewPhase::TerminalReview);
    }

    #[test]
    fn jump_to_edit_is_idempotent() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        for _ in 0..3 {
            verdict(&mut machine, Disposition::Confirmed);
        }
        let key = key_at(&machine, 1);

        machine.jump_to_edit(key).unwrap();
        let once = machine.cursor().clone();
        assert_eq!(
            machine.jump_to_edit(key),
            Err(ReviewError::IllegalTransition {
                phase: PhaseKind::Editing,
                intent: IntentKind::JumpToEdit,
            })
        );
        assert_eq!(machine.cursor(), &once);
    }

    #[test]
    fn refresh_keeps_edit_cursor_on_same_record() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        verdict(&mut machine, Disposition::Confirmed);
        verdict(&mut machine, Disposition::Disputed);
        machine.retreat().unwrap();
        let disputed = key_at(&machine, 1);

        // January certified upstream while February is open for editing
        let records = machine.snapshot().records().to_vec();
        let watermark = Some(machine.unconfirmed().get(0).unwrap().period_end);
        machine.replace_snapshot(RecordSnapshot::new(records, watermark));

        assert_eq!(
            machine.phase(),
            ReviewPhase::Reviewing { index: 0, editing: true }
        );
        assert_eq!(machine.current_record().unwrap().key(), disputed);
    }

    #[test]
    fn jump_to_unknown_record_is_rejected() {
        let mut machine =
            ReviewMachine::new(snapshot_with(&[Disposition::Confirmed, Disposition::Confirmed]));
        for _ in 0..2 {
            verdict(&mut machine, Disposition::Confirmed);
        }
        let stranger = formflow_test_utils::month_record(2030, 1).key();
        assert_eq!(
            machine.jump_to_edit(stranger),
            Err(ReviewError::RecordNotFound(stranger))
        );
    }

    #[test]
    fn jump_to_edit_rejected_while_reviewing() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        let key = key_at(&machine, 0);
        assert_eq!(
            machine.jump_to_edit(key),
            Err(ReviewError::IllegalTransition {
                phase: PhaseKind::Reviewing,
                intent: IntentKind::JumpToEdit,
            })
        );
    }

    #[test]
    fn finish_later_clears_and_exits() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        verdict(&mut machine, Disposition::Confirmed);
        let transition = machine.finish_later().unwrap();

        assert_eq!(transition.outcome, Outcome::Exited);
        assert_eq!(transition.destination(), Some(Destination::Landing));
        assert!(transition
            .persisted()
            .unwrap()
            .iter()
            .all(|r| !r.disposition.is_set()));
        assert_eq!(
            machine.snapshot().watermark(),
            three_month_snapshot().watermark()
        );
    }

    #[test]
    fn submit_success_and_repeat_clicks() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        for _ in 0..3 {
            verdict(&mut machine, Disposition::Confirmed);
        }

        let started = machine.submit().unwrap();
        assert_eq!(started.outcome, Outcome::SubmitStarted);
        assert!(matches!(started.effects.as_slice(), [Effect::Submit(p)] if p.records.len() == 3));
        assert_eq!(machine.phase(), ReviewPhase::Submitting);

        assert_eq!(machine.submit().unwrap().outcome, Outcome::Ignored);

        let done = machine
            .complete_submission(Ok(SubmissionReceipt::default()))
            .unwrap();
        assert_eq!(done.destination(), Some(Destination::SubmissionSucceeded));
        assert_eq!(machine.phase(), ReviewPhase::Submitted);
        assert_eq!(machine.submit().unwrap().outcome, Outcome::Ignored);
    }

    #[test]
    fn submit_failure_returns_to_terminal_review() {
        let mut machine = ReviewMachine::new(snapshot_with(&[]));
        machine.submit().unwrap();

        let failed = machine
            .complete_submission(Err(SubmissionError::Transport("reset".to_string())))
            .unwrap();
        assert_eq!(failed.outcome, Outcome::SubmitFailed);
        assert_eq!(failed.destination(), Some(Destination::SubmissionFailed));
        assert_eq!(machine.phase(), ReviewPhase::TerminalReview);
        assert_eq!(machine.submit().unwrap().outcome, Outcome::SubmitStarted);
    }

    #[test]
    fn settle_without_submission_is_rejected() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        assert!(machine
            .complete_submission(Ok(SubmissionReceipt::default()))
            .is_err());
    }

    #[test]
    fn view_reports_progress_and_titles() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        let view = machine.view();
        assert_eq!(view.progress, Progress { segment: 1, total: 4 });
        assert_eq!(view.title_postfix, "Verify January 2024");

        for _ in 0..3 {
            verdict(&mut machine, Disposition::Confirmed);
        }
        let view = machine.view();
        assert_eq!(view.progress, Progress { segment: 4, total: 4 });
        assert_eq!(view.title_postfix, "Review verifications");
        assert!(!view.skipped_ahead);
        assert!(!view.review_paused);
    }

    #[test]
    fn shrinking_snapshot_clamps_cursor() {
        let mut machine = ReviewMachine::new(three_month_snapshot());
        verdict(&mut machine, Disposition::Confirmed);
        verdict(&mut machine, Disposition::Confirmed);
        machine.replace_snapshot(snapshot_with(&[Disposition::Confirmed]));
        assert_eq!(machine.cursor().current_index, 1);
        assert_eq!(machine.phase(), ReviewPhase::TerminalReview);
    }

    fn any_disposition() -> impl Strategy<Value = Disposition> {
        prop_oneof![
            Just(Disposition::Unset),
            Just(Disposition::Confirmed),
            Just(Disposition::Disputed),
        ]
    }

    proptest! {
        #[test]
        fn prop_unset_advance_never_moves(len in 1usize..8, steps in 0usize..8) {
            let mut machine = ReviewMachine::new(snapshot_with(&vec![Disposition::Unset; len]));
            for _ in 0..steps.min(len - 1) {
                verdict(&mut machine, Disposition::Confirmed);
            }
            let before = machine.cursor().current_index;
            machine.select(Disposition::Unset).unwrap();
            let transition = machine.advance().unwrap();

            prop_assert_eq!(transition.outcome, Outcome::ValidationFailed);
            prop_assert_eq!(machine.cursor().current_index, before);
            prop_assert!(machine.cursor().continue_attempted);
        }

        #[test]
        fn prop_dispute_clears_every_later_record(
            initial in proptest::collection::vec(
                prop_oneof![Just(Disposition::Unset), Just(Disposition::Confirmed)],
                1..8,
            ),
            pick in any::<proptest::sample::Index>(),
        ) {
            let mut machine = ReviewMachine::new(snapshot_with(&initial));
            let target = pick.index(initial.len());
            for _ in 0..target {
                verdict(&mut machine, Disposition::Confirmed);
            }
            let target_end = machine.current_record().unwrap().period_end;
            let transition = verdict(&mut machine, Disposition::Disputed);

            for record in transition.persisted().unwrap() {
                if record.period_end > target_end {
                    prop_assert_eq!(record.disposition, Disposition::Unset);
                }
            }
            prop_assert_eq!(machine.phase(), ReviewPhase::TerminalReview);
        }

        #[test]
        fn prop_cursor_index_stays_in_bounds(
            initial in proptest::collection::vec(any_disposition(), 0..6),
            moves in proptest::collection::vec(0u8..4, 0..24),
        ) {
            let mut machine = ReviewMachine::new(snapshot_with(&initial));
            for step in moves {
                let result = match step {
                    0 => machine.select(Disposition::Confirmed),
                    1 => machine.advance(),
                    2 => machine.retreat(),
                    _ => machine.select(Disposition::Disputed),
                };
                if let Ok(transition) = result {
                    settle(&mut machine, &transition);
                }
                prop_assert!(machine.cursor().current_index <= machine.unconfirmed().len());
            }
        }
    }
}
