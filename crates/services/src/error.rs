//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionId, QuestionSetError, SettingsError};
use storage::StorageError;

/// Why a submitted answer was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidAnswer {
    #[error("unknown question {0}")]
    UnknownQuestion(QuestionId),
    #[error("option {index} is out of range for question {id} ({len} options)")]
    OptionOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },
}

/// Errors emitted by the quiz session and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for quiz")]
    EmptySet,
    #[error(transparent)]
    QuestionSet(QuestionSetError),
    #[error(transparent)]
    InvalidAnswer(#[from] InvalidAnswer),
    #[error("block {} still has {unanswered} unanswered question(s)", .block + 1)]
    PrematureAdvance { block: usize, unanswered: usize },
    #[error("already at the first block")]
    NoPreviousBlock,
    #[error("already at the last block")]
    LastBlock,
    #[error("finish is only available on the last block")]
    NotLastBlock,
    #[error("quiz is closed")]
    Closed,
    #[error("quiz is still in progress")]
    InProgress,
    #[error(transparent)]
    Source(#[from] StorageError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl From<QuestionSetError> for QuizError {
    fn from(err: QuestionSetError) -> Self {
        match err {
            QuestionSetError::Empty => Self::EmptySet,
            other => Self::QuestionSet(other),
        }
    }
}

impl QuizError {
    /// Gated no-ops the presentation layer can show and carry on from.
    #[must_use]
    pub fn is_rejected_transition(&self) -> bool {
        matches!(
            self,
            Self::PrematureAdvance { .. } | Self::NoPreviousBlock | Self::LastBlock | Self::NotLastBlock
        )
    }
}
