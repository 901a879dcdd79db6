use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use tracing::{debug, info, warn};

use quiz_core::blocks;
use quiz_core::model::{AnswerRecord, QuestionId, QuizSettings, RecordOutcome};
use quiz_core::Clock;

use super::navigation::{NavigationGate, QuizPhase};
use super::state::SessionState;
use super::store::QuestionStore;
use super::view::{
    BlockResult, ExitReport, INCOMPLETE_BLOCK_MESSAGE, QuestionView, QuizReport, QuizSnapshot,
    ValidationNotice,
};
use crate::error::{InvalidAnswer, QuizError};

/// Asks the user whether to abandon the quiz.
///
/// Closures returning `bool` implement this, so callers can pass `|| true`.
pub trait ConfirmExit {
    fn confirm_exit(&mut self) -> bool;
}

impl<F: FnMut() -> bool> ConfirmExit for F {
    fn confirm_exit(&mut self) -> bool {
        self()
    }
}

/// Result of a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// The record now stored for the question (the first one ever submitted).
    pub record: AnswerRecord,
    /// False when the question had already been answered.
    pub newly_recorded: bool,
    pub block_complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExitOutcome {
    /// The user declined; nothing changed.
    Cancelled,
    Exited(ExitReport),
}

#[derive(Debug, Clone)]
enum Status {
    Active,
    Finished(QuizReport),
    Exited(ExitReport),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt and the only owner of its `SessionState`.
///
/// Every user action goes through a method here; the presentation layer reads
/// [`QuizSession::snapshot`] afterwards and never derives scores itself.
pub struct QuizSession {
    store: QuestionStore,
    settings: QuizSettings,
    gate: NavigationGate,
    state: SessionState,
    status: Status,
    validation: Option<ValidationNotice>,
    clock: Clock,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Shuffle the store and begin at block 0.
    pub fn start<R: Rng + ?Sized>(
        store: QuestionStore,
        settings: QuizSettings,
        clock: Clock,
        rng: &mut R,
    ) -> Self {
        let order = store.shuffle(rng);
        let gate = NavigationGate::new(settings.questions_per_block());
        let session = Self {
            store,
            settings,
            gate,
            state: SessionState::new(order),
            status: Status::Active,
            validation: None,
            clock,
            started_at: clock.now(),
        };
        info!(
            questions = session.store.len(),
            blocks = session.total_blocks(),
            "quiz started"
        );
        session
    }

    #[must_use]
    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn gate(&self) -> &NavigationGate {
        &self.gate
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_block(&self) -> usize {
        self.state.current_block()
    }

    #[must_use]
    pub fn total_blocks(&self) -> usize {
        self.gate.total_blocks(&self.state)
    }

    #[must_use]
    pub fn is_last_block(&self) -> bool {
        self.gate.is_last_block(&self.state, self.current_block())
    }

    /// Ids of the current block.
    #[must_use]
    pub fn block_questions(&self) -> &[QuestionId] {
        self.gate.block(&self.state, self.current_block())
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.gate.can_advance(&self.state, self.current_block())
    }

    #[must_use]
    pub fn validation(&self) -> Option<&ValidationNotice> {
        self.validation.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.status, Status::Active)
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        match self.status {
            Status::Active => self.gate.phase(&self.state),
            Status::Finished(_) => QuizPhase::Finished,
            Status::Exited(_) => QuizPhase::Exited,
        }
    }

    //
    // ─── ACTIONS ──────────────────────────────────────────────────────────────
    //

    /// Record `option_index` for `id`. Re-answering keeps the first record.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Closed` after finish/exit and `QuizError::InvalidAnswer`
    /// for an unknown question or option. Neither changes any state.
    pub fn answer(&mut self, id: QuestionId, option_index: usize) -> Result<AnswerOutcome, QuizError> {
        self.ensure_active()?;
        let is_correct = self.grade(id, option_index).inspect_err(|err| {
            warn!(question = %id, option_index, error = %err, "rejected answer");
        })?;

        let outcome = self.state.record_answer(id, option_index, is_correct);
        self.validation = None;

        let record = self
            .state
            .answers()
            .get(id)
            .copied()
            .unwrap_or(AnswerRecord::new(option_index, is_correct));
        Ok(AnswerOutcome {
            record,
            newly_recorded: outcome == RecordOutcome::Recorded,
            block_complete: self.can_advance(),
        })
    }

    /// Move to the previous block. Answers are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoPreviousBlock` on block 0 and `QuizError::Closed`
    /// once the quiz is over.
    pub fn go_back(&mut self) -> Result<usize, QuizError> {
        self.ensure_active()?;
        let target = self.gate.back(self.current_block())?;
        self.move_to(target);
        Ok(target)
    }

    /// Move to the next block once the current one is fully answered.
    ///
    /// A refused move leaves the block index alone and raises a validation notice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::PrematureAdvance`, `QuizError::LastBlock` or `QuizError::Closed`.
    pub fn go_next(&mut self) -> Result<usize, QuizError> {
        self.ensure_active()?;
        let result = self.gate.next(&self.state, self.current_block());
        let target = self.gate_result(result)?;
        self.move_to(target);
        Ok(target)
    }

    /// Close the quiz from a completed last block.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotLastBlock`, `QuizError::PrematureAdvance` or `QuizError::Closed`.
    pub fn finish(&mut self) -> Result<QuizReport, QuizError> {
        self.ensure_active()?;
        let result = self.gate.finish(&self.state, self.current_block());
        self.gate_result(result)?;

        let total_questions = self.state.order().len();
        let score = self.state.totals();
        let report = QuizReport {
            total_questions,
            score,
            percentage: score.percentage(total_questions),
            message: self.settings.motivation_messages().last().cloned(),
            started_at: self.started_at,
            finished_at: self.clock.now(),
        };
        info!(
            hits = score.hits,
            errors = score.errors,
            total = total_questions,
            "quiz finished"
        );
        self.validation = None;
        self.status = Status::Finished(report.clone());
        Ok(report)
    }

    /// Abandon the quiz after asking `prompt`. Declining is a no-op.
    ///
    /// Works from any state. Exiting an already exited quiz returns the
    /// existing report without asking again.
    pub fn exit(&mut self, prompt: &mut impl ConfirmExit) -> ExitOutcome {
        if let Status::Exited(report) = &self.status {
            return ExitOutcome::Exited(report.clone());
        }
        if !prompt.confirm_exit() {
            debug!("exit cancelled");
            return ExitOutcome::Cancelled;
        }

        let total_questions = self.state.order().len();
        let score = self.state.totals();
        let report = ExitReport {
            answered: self.state.answers().len(),
            total_questions,
            score,
            percentage: score.percentage(total_questions),
            exited_at: self.clock.now(),
        };
        info!(
            answered = report.answered,
            total = total_questions,
            "quiz exited early"
        );
        self.validation = None;
        self.status = Status::Exited(report.clone());
        ExitOutcome::Exited(report)
    }

    /// Reshuffle and start over at block 0 with no answers.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InProgress` unless the quiz was finished or exited.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        if self.is_active() {
            return Err(QuizError::InProgress);
        }
        let order = self.store.shuffle(rng);
        self.state.reset(order);
        self.status = Status::Active;
        self.validation = None;
        self.started_at = self.clock.now();
        info!(questions = self.store.len(), "quiz restarted");
        Ok(())
    }

    //
    // ─── DERIVED VIEWS ────────────────────────────────────────────────────────
    //

    /// Results panel for the current block, once it is complete.
    #[must_use]
    pub fn block_result(&self) -> Option<BlockResult> {
        if !self.is_active() || !self.can_advance() {
            return None;
        }
        let block = self.current_block();
        let ids = self.block_questions();
        let message = blocks::motivation_message(
            block,
            self.state.is_quiz_complete(),
            self.settings.motivation_messages(),
        )
        .map(str::to_owned);
        Some(BlockResult {
            block,
            block_score: blocks::block_score(ids, self.state.answers()),
            totals: self.state.totals(),
            answered: self.state.answers().len(),
            message,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        let block = self.current_block();
        let start = blocks::block_range(
            self.state.order().len(),
            block,
            self.gate.block_size(),
        )
        .start;
        let questions = self
            .block_questions()
            .iter()
            .enumerate()
            .filter_map(|(offset, id)| {
                let question = self.store.question(*id)?;
                let answer = self.state.answers().get(*id).copied();
                Some(QuestionView::new(question, start + offset + 1, answer))
            })
            .collect();
        let active = self.is_active();

        QuizSnapshot {
            phase: self.phase(),
            current_block: block,
            total_blocks: self.total_blocks(),
            total_questions: self.state.order().len(),
            questions,
            answered: self.state.answers().len(),
            totals: self.state.totals(),
            is_block_complete: self.can_advance(),
            is_last_block: self.is_last_block(),
            can_go_back: active && block > 0,
            can_advance: active && self.can_advance(),
            validation: self.validation.clone(),
            block_result: self.block_result(),
            report: match &self.status {
                Status::Finished(report) => Some(report.clone()),
                _ => None,
            },
            exit_report: match &self.status {
                Status::Exited(report) => Some(report.clone()),
                _ => None,
            },
        }
    }

    //
    // ─── HELPERS ──────────────────────────────────────────────────────────────
    //

    fn ensure_active(&self) -> Result<(), QuizError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(QuizError::Closed)
        }
    }

    fn grade(&self, id: QuestionId, option_index: usize) -> Result<bool, InvalidAnswer> {
        let question = self
            .store
            .question(id)
            .ok_or(InvalidAnswer::UnknownQuestion(id))?;
        question
            .grade(option_index)
            .map_err(|_| InvalidAnswer::OptionOutOfRange {
                id,
                index: option_index,
                len: question.options().len(),
            })
    }

    /// Raise a validation notice for a refused advance, then pass the result on.
    fn gate_result<T>(&mut self, result: Result<T, QuizError>) -> Result<T, QuizError> {
        if let Err(QuizError::PrematureAdvance { block, unanswered }) = &result {
            warn!(block, unanswered, "advance refused, block incomplete");
            self.validation = Some(ValidationNotice {
                block: *block,
                unanswered: *unanswered,
                message: INCOMPLETE_BLOCK_MESSAGE,
            });
        }
        result
    }

    fn move_to(&mut self, block: usize) {
        debug!(from = self.current_block(), to = block, "block changed");
        self.state.set_current_block(block);
        self.validation = None;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.store.len())
            .field("current_block", &self.current_block())
            .field("answered", &self.state.answers().len())
            .field("phase", &self.phase())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, Question, Score};
    use quiz_core::time::{fixed_clock, fixed_now};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Option 0 is always the correct one.
    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}"),
            vec![
                AnswerOption::correct("right", format!("rationale {id}")),
                AnswerOption::incorrect("wrong"),
            ],
        )
        .unwrap()
    }

    fn build_session(n: u64) -> QuizSession {
        let raw = (1..=n).map(build_question).collect();
        let settings = QuizSettings::default();
        let store = QuestionStore::load(raw, &settings).unwrap();
        QuizSession::start(store, settings, fixed_clock(), &mut StdRng::seed_from_u64(42))
    }

    /// Answer the whole current block, the first `hits` of them correctly.
    fn answer_current_block(session: &mut QuizSession, hits: usize) {
        let ids = session.block_questions().to_vec();
        for (i, id) in ids.into_iter().enumerate() {
            let option = usize::from(i >= hits);
            session.answer(id, option).unwrap();
        }
    }

    #[test]
    fn starts_answering_block_zero() {
        let session = build_session(25);
        assert_eq!(session.phase(), QuizPhase::Answering { block: 0 });
        assert_eq!(session.total_blocks(), 3);
        assert_eq!(session.block_questions().len(), 10);
        assert_eq!(session.started_at(), fixed_now());
    }

    #[test]
    fn block_of_seven_hits_three_errors_can_advance() {
        let mut session = build_session(25);
        answer_current_block(&mut session, 7);

        let result = session.block_result().expect("block complete");
        assert_eq!(result.block_score, Score::new(7, 3));
        assert_eq!(result.totals, Score::new(7, 3));
        assert!(session.can_advance());
        assert_eq!(session.phase(), QuizPhase::BlockComplete { block: 0 });
    }

    #[test]
    fn rejected_next_keeps_block_and_raises_notice() {
        let mut session = build_session(25);
        let first = session.block_questions()[0];
        session.answer(first, 0).unwrap();

        let err = session.go_next().unwrap_err();
        assert!(matches!(err, QuizError::PrematureAdvance { block: 0, unanswered: 9 }));
        assert_eq!(session.current_block(), 0);
        let notice = session.validation().expect("notice shown");
        assert_eq!(notice.unanswered, 9);

        // Answering clears the notice.
        let second = session.block_questions()[1];
        session.answer(second, 0).unwrap();
        assert!(session.validation().is_none());
    }

    #[test]
    fn rejected_finish_keeps_state() {
        let mut session = build_session(5);
        let err = session.finish().unwrap_err();
        assert!(matches!(err, QuizError::PrematureAdvance { block: 0, .. }));
        assert!(session.is_active());
        assert!(session.validation().is_some());
    }

    #[test]
    fn duplicate_answer_keeps_first_choice() {
        let mut session = build_session(12);
        let id = session.block_questions()[0];

        let first = session.answer(id, 1).unwrap();
        assert!(first.newly_recorded);
        let again = session.answer(id, 0).unwrap();
        assert!(!again.newly_recorded);
        assert_eq!(again.record, AnswerRecord::new(1, false));
        assert_eq!(session.state().totals(), Score::new(0, 1));
    }

    #[test]
    fn invalid_answers_are_rejected_without_side_effects() {
        let mut session = build_session(12);
        let id = session.block_questions()[0];

        let err = session.answer(QuestionId::new(999), 0).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidAnswer(InvalidAnswer::UnknownQuestion(_))
        ));
        let err = session.answer(id, 2).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidAnswer(InvalidAnswer::OptionOutOfRange { index: 2, len: 2, .. })
        ));
        assert!(session.state().answers().is_empty());
    }

    #[test]
    fn back_keeps_existing_answers() {
        let mut session = build_session(25);
        answer_current_block(&mut session, 10);
        let block_zero = session.block_questions().to_vec();
        session.go_next().unwrap();
        let before = session.state().answers().clone();

        assert_eq!(session.go_back().unwrap(), 0);
        assert_eq!(session.state().answers(), &before);
        assert_eq!(session.block_questions(), block_zero.as_slice());
        assert!(session.can_advance());
        assert!(matches!(session.go_back(), Err(QuizError::NoPreviousBlock)));
    }

    #[test]
    fn motivation_message_forced_to_last_on_full_completion() {
        let mut session = build_session(25);
        let messages = session.settings().motivation_messages().to_vec();

        answer_current_block(&mut session, 10);
        let first = session.block_result().unwrap();
        assert_eq!(first.message.as_deref(), Some(messages[0].as_str()));
        session.go_next().unwrap();

        answer_current_block(&mut session, 10);
        assert_eq!(
            session.block_result().unwrap().message.as_deref(),
            Some(messages[1].as_str())
        );
        session.go_next().unwrap();

        answer_current_block(&mut session, 5);
        let last = session.block_result().unwrap();
        assert_eq!(last.block, 2);
        assert_eq!(last.message.as_deref(), Some(messages[5].as_str()));
    }

    #[test]
    fn finish_produces_report_and_closes() {
        let mut session = build_session(15);
        answer_current_block(&mut session, 6);
        session.go_next().unwrap();
        answer_current_block(&mut session, 5);

        assert!(matches!(session.go_next(), Err(QuizError::LastBlock)));
        let report = session.finish().unwrap();
        assert_eq!(report.total_questions, 15);
        assert_eq!(report.score, Score::new(11, 4));
        assert!((report.percentage - 11.0 / 15.0 * 100.0).abs() < 1e-9);
        assert_eq!(
            report.message.as_deref(),
            session.settings().motivation_messages().last().map(String::as_str)
        );
        assert_eq!(session.phase(), QuizPhase::Finished);

        assert!(matches!(session.go_back(), Err(QuizError::Closed)));
        assert!(matches!(session.finish(), Err(QuizError::Closed)));
        let id = session.block_questions()[0];
        assert!(matches!(session.answer(id, 0), Err(QuizError::Closed)));
    }

    #[test]
    fn declined_exit_changes_nothing() {
        let mut session = build_session(12);
        let id = session.block_questions()[0];
        session.answer(id, 0).unwrap();

        let outcome = session.exit(&mut || false);
        assert_eq!(outcome, ExitOutcome::Cancelled);
        assert!(session.is_active());
        assert_eq!(session.state().answers().len(), 1);
    }

    #[test]
    fn confirmed_exit_reports_progress() {
        let mut session = build_session(20);
        answer_current_block(&mut session, 4);

        let ExitOutcome::Exited(report) = session.exit(&mut || true) else {
            panic!("expected exit");
        };
        assert_eq!(report.answered, 10);
        assert_eq!(report.total_questions, 20);
        assert!((report.percentage - 20.0).abs() < 1e-9);
        assert_eq!(session.phase(), QuizPhase::Exited);

        // A second exit doesn't prompt again.
        let again = session.exit(&mut || -> bool { panic!("should not prompt") });
        assert_eq!(again, ExitOutcome::Exited(report));
    }

    #[test]
    fn restart_only_after_quiz_closed() {
        let mut session = build_session(12);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(session.restart(&mut rng), Err(QuizError::InProgress)));

        answer_current_block(&mut session, 3);
        session.go_next().unwrap();
        let _ = session.exit(&mut || true);

        session.restart(&mut rng).unwrap();
        assert!(session.is_active());
        assert_eq!(session.current_block(), 0);
        assert!(session.state().answers().is_empty());
        assert_eq!(session.state().totals(), Score::default());
        assert_eq!(session.phase(), QuizPhase::Answering { block: 0 });
    }

    #[test]
    fn snapshot_reflects_current_block() {
        let mut session = build_session(25);
        answer_current_block(&mut session, 10);
        session.go_next().unwrap();
        let id = session.block_questions()[0];
        session.answer(id, 1).unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.current_block, 1);
        assert_eq!(snap.total_blocks, 3);
        assert_eq!(snap.questions.len(), 10);
        assert_eq!(snap.questions[0].number, 11);
        assert_eq!(snap.questions[9].number, 20);
        assert_eq!(snap.questions[0].answer, Some(AnswerRecord::new(1, false)));
        assert_eq!(snap.questions[0].correct_index, Some(0));
        assert!(snap.questions[1].explanation.is_none());
        assert_eq!(snap.answered, 11);
        assert_eq!(snap.totals, Score::new(10, 1));
        assert!(!snap.is_block_complete);
        assert!(!snap.is_last_block);
        assert!(snap.can_go_back);
        assert!(!snap.can_advance);
        assert!(snap.block_result.is_none());
        assert!(snap.report.is_none());
    }
}
