use tokio::runtime::Handle;
use tracing::trace;

use services::{SpeechBackend, SpeechHandle, Utterance};

/// Terminal stand-in for a text-to-speech engine: prints the utterance after
/// its delay unless it was cancelled first.
#[derive(Debug, Clone)]
pub struct ConsoleSpeech {
    runtime: Handle,
}

impl ConsoleSpeech {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl SpeechBackend for ConsoleSpeech {
    fn speak(&self, utterance: Utterance, handle: SpeechHandle) {
        self.runtime.spawn(async move {
            tokio::time::sleep(utterance.delay).await;
            if handle.is_cancelled() {
                trace!("speech cancelled before start");
                return;
            }
            println!("  [{}] {}", utterance.lang, utterance.text);
        });
    }
}
