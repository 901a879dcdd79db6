use serde::Serialize;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("option {index} is out of range for question {id} ({len} options)")]
    OptionOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// One selectable answer of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    text: String,
    is_correct: bool,
    rationale: Option<String>,
}

impl AnswerOption {
    #[must_use]
    pub fn new(text: impl Into<String>, is_correct: bool, rationale: Option<String>) -> Self {
        Self {
            text: text.into(),
            is_correct,
            rationale,
        }
    }

    #[must_use]
    pub fn correct(text: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self::new(text, true, Some(rationale.into()))
    }

    #[must_use]
    pub fn incorrect(text: impl Into<String>) -> Self {
        Self::new(text, false, None)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }
}

/// Presentation letter for an option position (`0 -> 'A'`).
///
/// Returns `None` past `'Z'`.
#[must_use]
pub fn option_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// An immutable multiple-choice question.
///
/// Exactly one option is expected to be correct. That is assumed, not enforced:
/// grading simply reads the flag of the selected option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
}

impl Question {
    /// Build a question, checking only that a prompt and options are present.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::NoOptions`.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }
        Ok(Self {
            id,
            prompt,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }

    /// Whether choosing `index` answers this question correctly.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::OptionOutOfRange` for an index past the last option.
    pub fn grade(&self, index: usize) -> Result<bool, QuestionError> {
        self.option(index)
            .map(AnswerOption::is_correct)
            .ok_or(QuestionError::OptionOutOfRange {
                id: self.id,
                index,
                len: self.options.len(),
            })
    }

    /// Position of the first option flagged correct.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(AnswerOption::is_correct)
    }

    /// Rationale attached to the correct option, shown once the question is answered.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.correct_index()
            .and_then(|i| self.options[i].rationale())
    }
}
