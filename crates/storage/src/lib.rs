#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::JsonFileSource;
pub use repository::{InMemoryQuestionSource, QuestionSource, StorageError};
