mod config;
mod speech;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use config::QuizConfig;
use services::{Clock, QuizLoopService, ReadAloud};
use speech::ConsoleSpeech;
use storage::JsonFileSource;

#[derive(Parser, Debug)]
#[command(name = "quiz", version, about = "Block-by-block multiple-choice quiz runner")]
struct Cli {
    #[arg(short, long, help = "TOML config file")]
    config: Option<PathBuf>,

    #[arg(short, long, env = "QUIZ_QUESTIONS", help = "Questions JSON file")]
    questions: Option<PathBuf>,

    #[arg(long, help = "Seed for a reproducible shuffle")]
    seed: Option<u64>,

    #[arg(long, help = "Disable read-aloud")]
    no_speech: bool,
}

impl Cli {
    /// Defaults, then the config file, then command-line flags.
    fn resolve_config(&self) -> Result<QuizConfig> {
        let mut config = match &self.config {
            Some(path) => QuizConfig::load(path)?,
            None => QuizConfig::default(),
        };
        if let Some(path) = &self.questions {
            config.questions_path.clone_from(path);
        }
        if self.no_speech {
            config.speech.enabled = false;
        }
        Ok(config)
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Logs go to stderr so they don't interleave with the quiz on stdout.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_tracing(&config.log_filter);

    let settings = config.quiz_settings().context("invalid quiz settings")?;
    let source = Arc::new(JsonFileSource::new(&config.questions_path));
    let quiz = QuizLoopService::new(Clock::system(), source).with_settings(settings);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let session = quiz
        .start_quiz_with_rng(&mut rng)
        .await
        .with_context(|| {
            format!(
                "could not load questions from {}",
                config.questions_path.display()
            )
        })?;

    let speech = ReadAloud::new(ConsoleSpeech::new(tokio::runtime::Handle::current()))
        .with_lang(config.speech.lang.clone())
        .with_delay(Duration::from_millis(config.speech.delay_ms))
        .with_enabled(config.speech.enabled);

    terminal::run(session, speech, rng).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
