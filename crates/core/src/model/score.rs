use serde::Serialize;

use crate::model::answer::AnswerRecord;

/// Hit/error tally over some set of answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub hits: u32,
    pub errors: u32,
}

impl Score {
    #[must_use]
    pub fn new(hits: u32, errors: u32) -> Self {
        Self { hits, errors }
    }

    /// Count hits and errors from scratch.
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a AnswerRecord>) -> Self {
        let mut score = Self::default();
        for record in records {
            if record.is_correct {
                score.hits = score.hits.saturating_add(1);
            } else {
                score.errors = score.errors.saturating_add(1);
            }
        }
        score
    }

    /// Number of answers counted.
    #[must_use]
    pub fn answered(&self) -> u32 {
        self.hits.saturating_add(self.errors)
    }

    /// Hits as a percentage of `out_of` questions; `0.0` when `out_of` is zero.
    #[must_use]
    pub fn percentage(&self, out_of: usize) -> f64 {
        if out_of == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = f64::from(self.hits) / out_of as f64;
        ratio * 100.0
    }
}
