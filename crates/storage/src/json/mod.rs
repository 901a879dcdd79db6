use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::Question;
use tracing::{debug, warn};

use crate::repository::{QuestionSource, StorageError};

mod mapping;

pub use mapping::{CorrectFlag, OptionRecord, QuestionRecord, parse_questions};

/// Reads the question batch from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn load_questions(&self, limit: usize) -> Result<Vec<Question>, StorageError> {
        let shown = self.path.display().to_string();
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            warn!(path = %shown, error = %e, "failed to read question file");
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(shown.clone())
            } else {
                StorageError::Io(format!("{shown}: {e}"))
            }
        })?;

        let questions = parse_questions(&bytes, limit)?;
        debug!(path = %shown, count = questions.len(), "loaded question file");
        Ok(questions)
    }
}
