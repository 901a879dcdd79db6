//! Block evaluation: slicing the shuffled order into fixed-size blocks and
//! scoring them against the answer sheet.
//!
//! Everything here is a pure function of its inputs so the session layer can
//! recompute derived values after every action.

use std::ops::Range;

use crate::model::{AnswerSheet, QuestionId, Score};

/// Number of blocks needed for `question_count` questions (`ceil`).
#[must_use]
pub fn total_blocks(question_count: usize, block_size: usize) -> usize {
    if block_size == 0 {
        return 0;
    }
    question_count.div_ceil(block_size)
}

/// Index range `[block_index * size, block_index * size + size)` clipped to `len`.
#[must_use]
pub fn block_range(len: usize, block_index: usize, block_size: usize) -> Range<usize> {
    let start = block_index.saturating_mul(block_size).min(len);
    let end = start.saturating_add(block_size).min(len);
    start..end
}

/// The slice of `order` that makes up block `block_index`; empty past the end.
#[must_use]
pub fn block_questions<T>(order: &[T], block_index: usize, block_size: usize) -> &[T] {
    &order[block_range(order.len(), block_index, block_size)]
}

/// True iff every question of `block` has a recorded answer.
#[must_use]
pub fn is_block_complete(block: &[QuestionId], answers: &AnswerSheet) -> bool {
    block.iter().all(|id| answers.contains(*id))
}

/// Hits and errors over the questions of `block` only.
#[must_use]
pub fn block_score(block: &[QuestionId], answers: &AnswerSheet) -> Score {
    Score::tally(block.iter().filter_map(|id| answers.get(*id)))
}

/// Which message to show for a completed block.
///
/// In-progress blocks use `min(block_index, len - 2)`, which keeps the last
/// message for the fully answered quiz. Once every question of the quiz is
/// answered the last message is forced, whatever the block index.
/// Returns `None` when there are no messages.
#[must_use]
pub fn motivation_index(
    block_index: usize,
    quiz_complete: bool,
    message_count: usize,
) -> Option<usize> {
    let last = message_count.checked_sub(1)?;
    if quiz_complete {
        return Some(last);
    }
    Some(block_index.min(last.saturating_sub(1)))
}

#[must_use]
pub fn motivation_message(
    block_index: usize,
    quiz_complete: bool,
    messages: &[String],
) -> Option<&str> {
    motivation_index(block_index, quiz_complete, messages.len()).map(|i| messages[i].as_str())
}
