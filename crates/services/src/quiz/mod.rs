mod navigation;
mod session;
mod state;
mod store;
mod view;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::{InvalidAnswer, QuizError};
pub use navigation::{NavigationGate, QuizPhase};
pub use session::{AnswerOutcome, ConfirmExit, ExitOutcome, QuizSession};
pub use state::SessionState;
pub use store::{QuestionStore, ShuffledOrder};
pub use view::{
    BlockResult, ExitReport, INCOMPLETE_BLOCK_MESSAGE, OptionView, QuestionView, QuizReport,
    QuizSnapshot, ValidationNotice,
};
pub use workflow::QuizLoopService;
