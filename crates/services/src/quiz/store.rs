use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use quiz_core::model::{Question, QuestionId, QuestionSet, QuizSettings};

use crate::error::QuizError;

/// A permutation of the question ids, fixed for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShuffledOrder {
    ids: Vec<QuestionId>,
}

impl ShuffledOrder {
    #[must_use]
    pub fn as_slice(&self) -> &[QuestionId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Zero-based position of `id` in the order.
    #[must_use]
    pub fn position(&self, id: QuestionId) -> Option<usize> {
        self.ids.iter().position(|x| *x == id)
    }
}

/// Holds the original question set and deals out shuffled orders.
///
/// The set itself is shared and never mutated; every shuffle works on a copy of its ids.
#[derive(Debug, Clone)]
pub struct QuestionStore {
    questions: Arc<QuestionSet>,
}

impl QuestionStore {
    /// Validate and cap a raw batch using `settings.max_questions()`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptySet` if nothing is left after truncation.
    pub fn load(raw: Vec<Question>, settings: &QuizSettings) -> Result<Self, QuizError> {
        let set = QuestionSet::load_capped(raw, settings.max_questions())?;
        Ok(Self::from_set(set))
    }

    #[must_use]
    pub fn from_set(set: QuestionSet) -> Self {
        Self {
            questions: Arc::new(set),
        }
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Uniform random permutation (Fisher-Yates) of the question ids.
    pub fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> ShuffledOrder {
        let mut ids: Vec<QuestionId> = self.questions.ids().collect();
        ids.shuffle(rng);
        ShuffledOrder { ids }
    }
}
