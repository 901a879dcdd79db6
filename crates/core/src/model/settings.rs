use thiserror::Error;

use crate::model::question_set::MAX_QUESTIONS;

/// Default number of questions shown per block.
pub const QUESTIONS_PER_BLOCK: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per block must be > 0")]
    InvalidQuestionsPerBlock,

    #[error("max questions must be > 0")]
    InvalidMaxQuestions,
}

/// Built-in encouragement shown under each completed block.
///
/// The last entry is reserved for a fully answered quiz.
#[must_use]
pub fn default_motivation_messages() -> Vec<String> {
    [
        "Congratulations on the first block! You have the basics down. Stay focused, excellence is close!",
        "Impressive! Second stage done. Every hit is one step closer to full proficiency. Keep that determination!",
        "You're at the right pace! Getting past the halfway mark with this performance is worth noting. Keep going!",
        "Fourth block complete! Your focus and knowledge are sharp. Don't lose momentum, the home stretch is near!",
        "Excellent! This is your last block. Use everything you've learned to finish strong.",
        "Game over! You reached the end of the quiz. Persistence and dedication are the key to mastery. Be proud of your effort!",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Tunables for a quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    questions_per_block: usize,
    max_questions: usize,
    motivation_messages: Vec<String>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            questions_per_block: QUESTIONS_PER_BLOCK,
            max_questions: MAX_QUESTIONS,
            motivation_messages: default_motivation_messages(),
        }
    }
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// An empty message list is allowed and means no message is shown.
    ///
    /// # Errors
    ///
    /// Returns error if a size parameter is zero.
    pub fn new(
        questions_per_block: usize,
        max_questions: usize,
        motivation_messages: Vec<String>,
    ) -> Result<Self, SettingsError> {
        if questions_per_block == 0 {
            return Err(SettingsError::InvalidQuestionsPerBlock);
        }
        if max_questions == 0 {
            return Err(SettingsError::InvalidMaxQuestions);
        }
        Ok(Self {
            questions_per_block,
            max_questions,
            motivation_messages,
        })
    }

    #[must_use]
    pub fn questions_per_block(&self) -> usize {
        self.questions_per_block
    }

    #[must_use]
    pub fn max_questions(&self) -> usize {
        self.max_questions
    }

    #[must_use]
    pub fn motivation_messages(&self) -> &[String] {
        &self.motivation_messages
    }
}
