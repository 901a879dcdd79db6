use async_trait::async_trait;
use quiz_core::model::Question;
use thiserror::Error;

/// Errors surfaced by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("question source not found: {0}")]
    NotFound(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Contract for whatever delivers the question batch.
///
/// Implementations return at most `limit` questions in source order. Records
/// past the limit are skipped before any validation. Emptiness checks belong
/// to `QuestionSet::load`, not to the source.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the first `limit` questions in one batch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be read or a kept record
    /// cannot be decoded.
    async fn load_questions(&self, limit: usize) -> Result<Vec<Question>, StorageError>;
}

/// Fixed in-memory list of questions for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionSource {
    questions: Vec<Question>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn load_questions(&self, limit: usize) -> Result<Vec<Question>, StorageError> {
        Ok(self.questions.iter().take(limit).cloned().collect())
    }
}
