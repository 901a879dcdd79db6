use quiz_core::model::{AnswerRecord, AnswerSheet, QuestionId, RecordOutcome, Score};
use tracing::debug;

use super::store::ShuffledOrder;

/// Mutable state of one quiz attempt.
///
/// `answers` is the source of truth. `totals` is a cache recomputed by full
/// recount whenever a new answer lands, so `totals.answered() == answers.len()`
/// holds after every call.
#[derive(Debug, Clone)]
pub struct SessionState {
    order: ShuffledOrder,
    current_block: usize,
    answers: AnswerSheet,
    totals: Score,
}

impl SessionState {
    #[must_use]
    pub fn new(order: ShuffledOrder) -> Self {
        Self {
            order,
            current_block: 0,
            answers: AnswerSheet::new(),
            totals: Score::default(),
        }
    }

    /// Start over with a new order: no answers, block 0, zero totals.
    pub fn reset(&mut self, order: ShuffledOrder) {
        self.order = order;
        self.current_block = 0;
        self.answers.clear();
        self.totals = Score::default();
    }

    /// Store the first answer for `id`; later submissions for the same id are ignored.
    pub fn record_answer(
        &mut self,
        id: QuestionId,
        selected_index: usize,
        is_correct: bool,
    ) -> RecordOutcome {
        let outcome = self
            .answers
            .record(id, AnswerRecord::new(selected_index, is_correct));
        match outcome {
            RecordOutcome::Recorded => {
                self.totals = self.answers.tally();
                debug!(question = %id, selected_index, is_correct, "answer recorded");
            }
            RecordOutcome::AlreadyAnswered => {
                debug!(question = %id, "answer already recorded, ignoring");
            }
        }
        outcome
    }

    #[must_use]
    pub fn order(&self) -> &ShuffledOrder {
        &self.order
    }

    #[must_use]
    pub fn current_block(&self) -> usize {
        self.current_block
    }

    pub(crate) fn set_current_block(&mut self, block: usize) {
        self.current_block = block;
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn totals(&self) -> Score {
        self.totals
    }

    #[must_use]
    pub fn total_hits(&self) -> u32 {
        self.totals.hits
    }

    #[must_use]
    pub fn total_errors(&self) -> u32 {
        self.totals.errors
    }

    /// Every question of the order has an answer.
    #[must_use]
    pub fn is_quiz_complete(&self) -> bool {
        self.order
            .as_slice()
            .iter()
            .all(|id| self.answers.contains(*id))
    }
}
