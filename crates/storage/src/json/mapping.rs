use quiz_core::model::{AnswerOption, Question, QuestionId};
use serde::Deserialize;

use crate::repository::StorageError;

/// Wire shape of one entry in `questions.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    pub id: u64,
    pub question: String,
    pub options: Vec<OptionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRecord {
    pub text: String,
    #[serde(default)]
    pub is_correct: CorrectFlag,
    #[serde(default)]
    pub rationale: Option<String>,
}

/// `isCorrect` shows up both as a JSON boolean and as `"true"`/`"false"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CorrectFlag {
    Bool(bool),
    Text(String),
}

impl Default for CorrectFlag {
    fn default() -> Self {
        Self::Bool(false)
    }
}

impl CorrectFlag {
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

impl QuestionRecord {
    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` when the prompt or options are missing.
    pub fn into_question(self) -> Result<Question, StorageError> {
        let options = self
            .options
            .into_iter()
            .map(|o| {
                let rationale = o.rationale.filter(|r| !r.trim().is_empty());
                AnswerOption::new(o.text, o.is_correct.is_set(), rationale)
            })
            .collect();
        Question::new(QuestionId::new(self.id), self.question, options)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Decode a JSON array of question records, keeping the first `limit`.
///
/// Records past `limit` are dropped before conversion, so they are never
/// validated.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON or an invalid kept
/// record.
pub fn parse_questions(bytes: &[u8], limit: usize) -> Result<Vec<Question>, StorageError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;
    records
        .into_iter()
        .take(limit)
        .map(QuestionRecord::into_question)
        .collect()
}
