use chrono::{DateTime, Utc};
use serde::Serialize;

use quiz_core::model::{AnswerRecord, Question, QuestionId, Score, option_letter};

use super::navigation::QuizPhase;

/// Shown after a refused "next"/"finish".
pub const INCOMPLETE_BLOCK_MESSAGE: &str =
    "Answer every question in this block before continuing.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationNotice {
    pub block: usize,
    pub unanswered: usize,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub letter: Option<char>,
    pub text: String,
}

/// One question as the presentation layer needs it.
///
/// `correct_index` and `explanation` stay hidden until the question is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    /// 1-based position in the shuffled order.
    pub number: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub answer: Option<AnswerRecord>,
    pub correct_index: Option<usize>,
    pub explanation: Option<String>,
}

impl QuestionView {
    #[must_use]
    pub fn new(question: &Question, number: usize, answer: Option<AnswerRecord>) -> Self {
        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(i, o)| OptionView {
                letter: option_letter(i),
                text: o.text().to_owned(),
            })
            .collect();
        let revealed = answer.is_some();
        Self {
            id: question.id(),
            number,
            prompt: question.prompt().to_owned(),
            options,
            answer,
            correct_index: question.correct_index().filter(|_| revealed),
            explanation: question
                .explanation()
                .filter(|_| revealed)
                .map(str::to_owned),
        }
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

/// Results panel for a completed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockResult {
    pub block: usize,
    pub block_score: Score,
    pub totals: Score,
    pub answered: usize,
    pub message: Option<String>,
}

/// Summary produced by a successful finish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizReport {
    pub total_questions: usize,
    pub score: Score,
    pub percentage: f64,
    pub message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Summary produced by a confirmed early exit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitReport {
    pub answered: usize,
    pub total_questions: usize,
    pub score: Score,
    /// Hits over all questions, answered or not.
    pub percentage: f64,
    pub exited_at: DateTime<Utc>,
}

/// Read-only view of a session after any action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSnapshot {
    pub phase: QuizPhase,
    pub current_block: usize,
    pub total_blocks: usize,
    pub total_questions: usize,
    pub questions: Vec<QuestionView>,
    pub answered: usize,
    pub totals: Score,
    pub is_block_complete: bool,
    pub is_last_block: bool,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub validation: Option<ValidationNotice>,
    pub block_result: Option<BlockResult>,
    pub report: Option<QuizReport>,
    pub exit_report: Option<ExitReport>,
}
