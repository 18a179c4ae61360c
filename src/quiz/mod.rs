//! Interactive quiz walkthrough

pub mod quiz_session;

pub use quiz_session::{AnswerFeedback, ChoiceMark, QuizPhase, QuizSession, QuizSubscriber};
