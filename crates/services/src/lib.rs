#![forbid(unsafe_code)]

pub mod audio;
pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use audio::{ReadAloud, SpeechBackend, SpeechHandle, Utterance};
pub use error::{InvalidAnswer, QuizError};
pub use quiz::{
    ConfirmExit, ExitOutcome, QuestionStore, QuizLoopService, QuizPhase, QuizSession, QuizSnapshot,
};
