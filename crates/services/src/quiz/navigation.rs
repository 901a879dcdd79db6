use serde::Serialize;

use quiz_core::blocks;
use quiz_core::model::QuestionId;

use super::state::SessionState;
use crate::error::QuizError;

/// Where a session stands.
///
/// `Answering` and `BlockComplete` are derived from the answers of the current
/// block. `Finished` and `Exited` are terminal until a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizPhase {
    Answering { block: usize },
    BlockComplete { block: usize },
    Finished,
    Exited,
}

/// Decides which block transitions are allowed.
///
/// The gate never mutates state; it returns the target block (or why the move
/// is refused) and the session applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationGate {
    block_size: usize,
}

impl NavigationGate {
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[must_use]
    pub fn total_blocks(&self, state: &SessionState) -> usize {
        blocks::total_blocks(state.order().len(), self.block_size)
    }

    /// Question ids of `block_index`, in shuffled order.
    #[must_use]
    pub fn block<'a>(&self, state: &'a SessionState, block_index: usize) -> &'a [QuestionId] {
        blocks::block_questions(state.order().as_slice(), block_index, self.block_size)
    }

    #[must_use]
    pub fn is_last_block(&self, state: &SessionState, block_index: usize) -> bool {
        block_index + 1 >= self.total_blocks(state)
    }

    /// Whether "next"/"finish" may leave `block_index`.
    #[must_use]
    pub fn can_advance(&self, state: &SessionState, block_index: usize) -> bool {
        blocks::is_block_complete(self.block(state, block_index), state.answers())
    }

    /// Questions of `block_index` still waiting for an answer.
    #[must_use]
    pub fn unanswered(&self, state: &SessionState, block_index: usize) -> usize {
        self.block(state, block_index)
            .iter()
            .filter(|id| !state.answers().contains(**id))
            .count()
    }

    /// Target of a "back" move. Never gated by completion.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoPreviousBlock` on block 0.
    pub fn back(&self, block_index: usize) -> Result<usize, QuizError> {
        block_index.checked_sub(1).ok_or(QuizError::NoPreviousBlock)
    }

    /// Target of a "next" move.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::PrematureAdvance` while the block has unanswered
    /// questions, and `QuizError::LastBlock` on the last block.
    pub fn next(&self, state: &SessionState, block_index: usize) -> Result<usize, QuizError> {
        self.ensure_can_advance(state, block_index)?;
        if self.is_last_block(state, block_index) {
            return Err(QuizError::LastBlock);
        }
        Ok(block_index + 1)
    }

    /// Check that "finish" is allowed from `block_index`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotLastBlock` before the last block and
    /// `QuizError::PrematureAdvance` while it has unanswered questions.
    pub fn finish(&self, state: &SessionState, block_index: usize) -> Result<(), QuizError> {
        if !self.is_last_block(state, block_index) {
            return Err(QuizError::NotLastBlock);
        }
        self.ensure_can_advance(state, block_index)
    }

    /// `Answering` or `BlockComplete` for the current block.
    #[must_use]
    pub fn phase(&self, state: &SessionState) -> QuizPhase {
        let block = state.current_block();
        if self.can_advance(state, block) {
            QuizPhase::BlockComplete { block }
        } else {
            QuizPhase::Answering { block }
        }
    }

    fn ensure_can_advance(&self, state: &SessionState, block_index: usize) -> Result<(), QuizError> {
        if self.can_advance(state, block_index) {
            return Ok(());
        }
        Err(QuizError::PrematureAdvance {
            block: block_index,
            unanswered: self.unanswered(state, block_index),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::store::QuestionStore;
    use quiz_core::model::{AnswerOption, Question, QuizSettings};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state(n: u64) -> SessionState {
        let raw = (1..=n)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    "Q",
                    vec![AnswerOption::correct("a", "r")],
                )
                .unwrap()
            })
            .collect();
        let store = QuestionStore::load(raw, &QuizSettings::default()).unwrap();
        SessionState::new(store.shuffle(&mut StdRng::seed_from_u64(11)))
    }

    fn answer_block(gate: &NavigationGate, state: &mut SessionState, block: usize) {
        let ids = gate.block(state, block).to_vec();
        for id in ids {
            state.record_answer(id, 0, true);
        }
    }

    #[test]
    fn next_is_refused_until_block_complete() {
        let gate = NavigationGate::new(10);
        let mut state = state(25);

        let err = gate.next(&state, 0).unwrap_err();
        assert!(matches!(err, QuizError::PrematureAdvance { block: 0, unanswered: 10 }));

        answer_block(&gate, &mut state, 0);
        assert_eq!(gate.next(&state, 0).unwrap(), 1);
    }

    #[test]
    fn next_on_last_block_is_refused() {
        let gate = NavigationGate::new(10);
        let mut state = state(25);
        answer_block(&gate, &mut state, 2);
        assert!(matches!(gate.next(&state, 2), Err(QuizError::LastBlock)));
        assert!(gate.finish(&state, 2).is_ok());
    }

    #[test]
    fn finish_requires_last_block() {
        let gate = NavigationGate::new(10);
        let mut state = state(25);
        answer_block(&gate, &mut state, 0);
        assert!(matches!(gate.finish(&state, 0), Err(QuizError::NotLastBlock)));
        assert!(matches!(
            gate.finish(&state, 2),
            Err(QuizError::PrematureAdvance { block: 2, unanswered: 5 })
        ));
    }

    #[test]
    fn back_is_never_gated() {
        let gate = NavigationGate::new(10);
        assert_eq!(gate.back(2).unwrap(), 1);
        assert!(matches!(gate.back(0), Err(QuizError::NoPreviousBlock)));
    }

    #[test]
    fn phase_follows_current_block_completion() {
        let gate = NavigationGate::new(10);
        let mut state = state(15);
        assert_eq!(gate.phase(&state), QuizPhase::Answering { block: 0 });
        answer_block(&gate, &mut state, 0);
        assert_eq!(gate.phase(&state), QuizPhase::BlockComplete { block: 0 });
        state.set_current_block(1);
        assert_eq!(gate.phase(&state), QuizPhase::Answering { block: 1 });
    }

    #[test]
    fn single_block_quiz_is_its_own_last_block() {
        let gate = NavigationGate::new(10);
        let state = state(4);
        assert_eq!(gate.total_blocks(&state), 1);
        assert!(gate.is_last_block(&state, 0));
    }
}
