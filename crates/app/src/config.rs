use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    MAX_QUESTIONS, QUESTIONS_PER_BLOCK, QuizSettings, SettingsError, default_motivation_messages,
};
use services::audio::{DEFAULT_SPEECH_DELAY, DEFAULT_SPEECH_LANG};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,
    #[serde(default = "default_speech_lang")]
    pub lang: String,
    #[serde(default = "default_speech_delay_ms")]
    pub delay_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
            lang: default_speech_lang(),
            delay_ms: default_speech_delay_ms(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default = "default_questions_path")]
    pub questions_path: PathBuf,
    #[serde(default = "default_questions_per_block")]
    pub questions_per_block: usize,
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
    #[serde(default = "default_motivation_messages")]
    pub motivation_messages: Vec<String>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_questions_path() -> PathBuf {
    PathBuf::from("questions.json")
}
fn default_questions_per_block() -> usize {
    QUESTIONS_PER_BLOCK
}
fn default_max_questions() -> usize {
    MAX_QUESTIONS
}
fn default_log_filter() -> String {
    "warn".to_string()
}
fn default_speech_enabled() -> bool {
    true
}
fn default_speech_lang() -> String {
    DEFAULT_SPEECH_LANG.to_string()
}
fn default_speech_delay_ms() -> u64 {
    u64::try_from(DEFAULT_SPEECH_DELAY.as_millis()).unwrap_or(100)
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_path: default_questions_path(),
            questions_per_block: default_questions_per_block(),
            max_questions: default_max_questions(),
            motivation_messages: default_motivation_messages(),
            log_filter: default_log_filter(),
            speech: SpeechConfig::default(),
        }
    }
}

impl QuizConfig {
    /// Read a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validated domain settings for this config.
    pub fn quiz_settings(&self) -> Result<QuizSettings, SettingsError> {
        QuizSettings::new(
            self.questions_per_block,
            self.max_questions,
            self.motivation_messages.clone(),
        )
    }
}
