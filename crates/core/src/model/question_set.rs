use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// Upper bound on how many questions a single quiz uses.
pub const MAX_QUESTIONS: usize = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question source yielded no usable questions")]
    Empty,

    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),
}

/// The immutable, validated list of questions one quiz is played from.
///
/// Never empty and never longer than the cap it was loaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Load a set capped at [`MAX_QUESTIONS`].
    ///
    /// # Errors
    ///
    /// See [`QuestionSet::load_capped`].
    pub fn load(raw: Vec<Question>) -> Result<Self, QuestionSetError> {
        Self::load_capped(raw, MAX_QUESTIONS)
    }

    /// Keep the first `cap` questions of `raw`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` if nothing is left after truncation, and
    /// `QuestionSetError::DuplicateId` if two kept questions share an id.
    pub fn load_capped(mut raw: Vec<Question>, cap: usize) -> Result<Self, QuestionSetError> {
        raw.truncate(cap);
        if raw.is_empty() {
            return Err(QuestionSetError::Empty);
        }

        let mut seen = HashSet::with_capacity(raw.len());
        for question in &raw {
            if !seen.insert(question.id()) {
                return Err(QuestionSetError::DuplicateId(question.id()));
            }
        }

        Ok(Self { questions: raw })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a loaded set; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Ids in source order.
    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(Question::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOption;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec![AnswerOption::correct("yes", "because"), AnswerOption::incorrect("no")],
        )
        .unwrap()
    }

    fn questions(n: u64) -> Vec<Question> {
        (1..=n).map(question).collect()
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(QuestionSet::load(Vec::new()), Err(QuestionSetError::Empty));
    }

    #[test]
    fn zero_cap_leaves_nothing() {
        assert_eq!(
            QuestionSet::load_capped(questions(3), 0),
            Err(QuestionSetError::Empty)
        );
    }

    #[test]
    fn long_input_is_truncated_to_first_fifty() {
        let set = QuestionSet::load(questions(60)).unwrap();
        assert_eq!(set.len(), MAX_QUESTIONS);
        assert_eq!(set.questions().last().unwrap().id(), QuestionId::new(50));
        assert!(set.get(QuestionId::new(51)).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut raw = questions(3);
        raw.push(question(2));
        assert_eq!(
            QuestionSet::load(raw),
            Err(QuestionSetError::DuplicateId(QuestionId::new(2)))
        );
    }

    #[test]
    fn duplicates_past_the_cap_are_ignored() {
        let mut raw = questions(2);
        raw.push(question(1));
        let set = QuestionSet::load_capped(raw, 2).unwrap();
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![QuestionId::new(1), QuestionId::new(2)]);
    }
}
