use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use quiz_core::Clock;
use quiz_core::model::QuizSettings;
use storage::QuestionSource;

use super::session::QuizSession;
use super::store::QuestionStore;
use crate::error::QuizError;

/// Loads the question batch and opens sessions on it.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    settings: QuizSettings,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            settings: QuizSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Fetch at most `max_questions` questions and validate them as a set.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Source` when the source fails and `QuizError::EmptySet`
    /// when it yields nothing usable. Neither is retried.
    pub async fn load_store(&self) -> Result<QuestionStore, QuizError> {
        let raw = self
            .source
            .load_questions(self.settings.max_questions())
            .await
            .inspect_err(|err| {
                warn!(error = %err, "question source failed");
            })?;
        let store = QuestionStore::load(raw, &self.settings)?;
        info!(count = store.len(), "question set loaded");
        Ok(store)
    }

    /// Start a quiz shuffled with the thread-local generator.
    ///
    /// # Errors
    ///
    /// See [`QuizLoopService::load_store`].
    pub async fn start_quiz(&self) -> Result<QuizSession, QuizError> {
        let store = self.load_store().await?;
        let mut rng = rand::rng();
        Ok(QuizSession::start(
            store,
            self.settings.clone(),
            self.clock,
            &mut rng,
        ))
    }

    /// Start a quiz shuffled with `rng`, for reproducible orders.
    ///
    /// # Errors
    ///
    /// See [`QuizLoopService::load_store`].
    pub async fn start_quiz_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuizSession, QuizError> {
        let store = self.load_store().await?;
        Ok(QuizSession::start(
            store,
            self.settings.clone(),
            self.clock,
            rng,
        ))
    }
}
