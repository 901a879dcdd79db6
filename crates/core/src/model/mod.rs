mod answer;
mod ids;
mod question;
mod question_set;
mod score;
mod settings;

pub use ids::QuestionId;

pub use answer::{AnswerRecord, AnswerSheet, RecordOutcome};
pub use question::{AnswerOption, Question, QuestionError, option_letter};
pub use question_set::{MAX_QUESTIONS, QuestionSet, QuestionSetError};
pub use score::Score;
pub use settings::{QUESTIONS_PER_BLOCK, QuizSettings, SettingsError, default_motivation_messages};
