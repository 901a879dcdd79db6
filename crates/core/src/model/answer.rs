use std::collections::HashMap;

use serde::Serialize;

use crate::model::ids::QuestionId;
use crate::model::score::Score;

/// The answer stored for one question. Never changes once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub selected_index: usize,
    pub is_correct: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(selected_index: usize, is_correct: bool) -> Self {
        Self {
            selected_index,
            is_correct,
        }
    }
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// The question already had a record; the stored one is kept as is.
    AlreadyAnswered,
}

/// Answers keyed by question id: the single source of truth for scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    records: HashMap<QuestionId, AnswerRecord>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` unless `id` was already answered.
    pub fn record(&mut self, id: QuestionId, record: AnswerRecord) -> RecordOutcome {
        if self.records.contains_key(&id) {
            return RecordOutcome::AlreadyAnswered;
        }
        self.records.insert(id, record);
        RecordOutcome::Recorded
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&AnswerRecord> {
        self.records.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.records.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &AnswerRecord)> + '_ {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// Full recount over every stored record.
    #[must_use]
    pub fn tally(&self) -> Score {
        Score::tally(self.records.values())
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
