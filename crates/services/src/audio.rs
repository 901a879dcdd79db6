//! Read-aloud collaborator.
//!
//! Speech is fire-and-forget: the backend receives an utterance plus a
//! [`SpeechHandle`] and is expected to stop as soon as the handle is cancelled.
//! Nothing here touches session state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use quiz_core::model::{Question, option_letter};

/// Language tag used when none is configured.
pub const DEFAULT_SPEECH_LANG: &str = "pt-BR";

/// Pause before speech starts, giving a preceding cancel time to settle.
pub const DEFAULT_SPEECH_DELAY: Duration = Duration::from_millis(100);

/// Cancellation token for one utterance. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct SpeechHandle {
    cancelled: Arc<AtomicBool>,
}

impl SpeechHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub delay: Duration,
}

/// Whatever actually produces sound (or a stand-in for it).
pub trait SpeechBackend {
    /// Begin speaking. Must return promptly; playback happens elsewhere.
    fn speak(&self, utterance: Utterance, handle: SpeechHandle);
}

/// Owns at most one in-flight utterance; starting a new one cancels the old.
#[derive(Debug)]
pub struct ReadAloud<B> {
    backend: B,
    lang: String,
    delay: Duration,
    enabled: bool,
    current: Option<SpeechHandle>,
}

impl<B: SpeechBackend> ReadAloud<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            lang: DEFAULT_SPEECH_LANG.to_string(),
            delay: DEFAULT_SPEECH_DELAY,
            enabled: true,
            current: None,
        }
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Cancel whatever is playing, then speak `text`.
    ///
    /// Returns `None` when read-aloud is disabled.
    pub fn read(&mut self, text: impl Into<String>) -> Option<SpeechHandle> {
        self.stop();
        if !self.enabled {
            return None;
        }
        let handle = SpeechHandle::new();
        let utterance = Utterance {
            text: text.into(),
            lang: self.lang.clone(),
            delay: self.delay,
        };
        debug!(lang = %utterance.lang, chars = utterance.text.len(), "speech started");
        self.backend.speak(utterance, handle.clone());
        self.current = Some(handle.clone());
        Some(handle)
    }

    pub fn read_question(&mut self, question: &Question) -> Option<SpeechHandle> {
        self.read(question.prompt())
    }

    /// Speak `"Option B, <text>"`; `None` for an unknown option.
    pub fn read_option(&mut self, question: &Question, index: usize) -> Option<SpeechHandle> {
        let option = question.option(index)?;
        let text = match option_letter(index) {
            Some(letter) => format!("Option {letter}, {}", option.text()),
            None => option.text().to_owned(),
        };
        self.read(text)
    }

    /// Cancel the in-flight utterance, if any.
    pub fn stop(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, QuestionId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        spoken: Mutex<Vec<(Utterance, SpeechHandle)>>,
    }

    impl SpeechBackend for RecordingBackend {
        fn speak(&self, utterance: Utterance, handle: SpeechHandle) {
            self.spoken.lock().unwrap().push((utterance, handle));
        }
    }

    fn question() -> Question {
        Question::new(
            QuestionId::new(1),
            "What is 2 + 2?",
            vec![AnswerOption::incorrect("3"), AnswerOption::correct("4", "math")],
        )
        .unwrap()
    }

    #[test]
    fn new_speech_cancels_previous() {
        let mut reader = ReadAloud::new(RecordingBackend::default());
        let first = reader.read("one").unwrap();
        let second = reader.read("two").unwrap();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        reader.stop();
        assert!(second.is_cancelled());
    }

    #[test]
    fn utterances_carry_lang_and_delay() {
        let mut reader = ReadAloud::new(RecordingBackend::default())
            .with_lang("en-US")
            .with_delay(Duration::ZERO);
        reader.read_question(&question());
        reader.read_option(&question(), 1);

        let spoken = reader.backend().spoken.lock().unwrap();
        assert_eq!(spoken[0].0.text, "What is 2 + 2?");
        assert_eq!(spoken[1].0.text, "Option B, 4");
        assert_eq!(spoken[1].0.lang, "en-US");
        assert_eq!(spoken[1].0.delay, Duration::ZERO);
    }

    #[test]
    fn disabled_reader_only_cancels() {
        let mut reader = ReadAloud::new(RecordingBackend::default());
        let handle = reader.read("before").unwrap();
        let mut reader = reader.with_enabled(false);
        assert!(reader.read("after").is_none());
        assert!(handle.is_cancelled());
        assert_eq!(reader.backend().spoken.lock().unwrap().len(), 1);
    }

    #[test]
    fn unknown_option_is_not_spoken() {
        let mut reader = ReadAloud::new(RecordingBackend::default());
        assert!(reader.read_option(&question(), 7).is_none());
        assert!(reader.backend().spoken.lock().unwrap().is_empty());
    }
}
