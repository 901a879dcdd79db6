//! Line-oriented terminal presentation of a quiz session.

use std::fmt::Write as _;

use anyhow::Result;
use rand::rngs::StdRng;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use quiz_core::model::QuestionId;
use services::quiz::{ExitReport, QuizReport};
use services::{ExitOutcome, QuizError, QuizPhase, QuizSession, QuizSnapshot, ReadAloud};

use crate::speech::ConsoleSpeech;

const HELP: &str = "\
Commands:
  <n><letter>   answer question n with option letter (e.g. 3b)
  s <n>         read question n aloud; s <n><letter> reads an option
  n             next block        f   finish quiz
  b             previous block    x   exit quiz (asks for confirmation)
  r             restart (after finishing or exiting)
  h             help              q   quit";

/// One parsed line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Answer { number: usize, option: usize },
    Speak { number: usize, option: Option<usize> },
    Next,
    Back,
    Finish,
    Exit,
    Restart,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("unrecognised command: {0}")]
    Unknown(String),
}

fn parse_target(raw: &str) -> Option<(usize, Option<usize>)> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, rest) = raw.split_at(split);
    let number = digits.parse::<usize>().ok()?;
    let rest = rest.trim();
    if rest.is_empty() {
        return Some((number, None));
    }
    let mut chars = rest.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    Some((number, Some(usize::from(letter as u8 - b'A'))))
}

/// Parse a command line such as `3b`, `s 4`, `n`.
pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommandError::Empty);
    }
    let unknown = || CommandError::Unknown(trimmed.to_string());

    match trimmed.to_ascii_lowercase().as_str() {
        "n" | "next" => return Ok(Command::Next),
        "b" | "back" => return Ok(Command::Back),
        "f" | "finish" => return Ok(Command::Finish),
        "x" | "exit" => return Ok(Command::Exit),
        "r" | "restart" => return Ok(Command::Restart),
        "h" | "help" | "?" => return Ok(Command::Help),
        "q" | "quit" => return Ok(Command::Quit),
        _ => {}
    }

    if let Some(rest) = trimmed.strip_prefix(['s', 'S']) {
        let (number, option) = parse_target(rest).ok_or_else(unknown)?;
        return Ok(Command::Speak { number, option });
    }

    match parse_target(trimmed) {
        Some((number, Some(option))) => Ok(Command::Answer { number, option }),
        _ => Err(unknown()),
    }
}

fn render_final(out: &mut String, report: &QuizReport) {
    let _ = writeln!(out, "Final result");
    let _ = writeln!(out, "  Questions: {}", report.total_questions);
    let _ = writeln!(out, "  Hits: {}", report.score.hits);
    let _ = writeln!(out, "  Errors: {}", report.score.errors);
    let _ = writeln!(out, "  Score: {:.2}%", report.percentage);
    if let Some(message) = &report.message {
        let _ = writeln!(out, "  {message} Get ready for the next challenge!");
    }
    let _ = writeln!(out, "Type r to try again or q to quit.");
}

fn render_exit(out: &mut String, report: &ExitReport) {
    let _ = writeln!(out, "Early exit");
    let _ = writeln!(
        out,
        "  You answered {} of {} questions.",
        report.answered, report.total_questions
    );
    let _ = writeln!(
        out,
        "  Hits: {}  Errors: {}  Score: {:.2}%",
        report.score.hits, report.score.errors, report.percentage
    );
    let _ = writeln!(out, "Type r to start over or q to quit.");
}

/// Text rendering of a snapshot.
#[must_use]
pub fn render(snapshot: &QuizSnapshot) -> String {
    let mut out = String::new();
    if let Some(report) = &snapshot.report {
        render_final(&mut out, report);
        return out;
    }
    if let Some(report) = &snapshot.exit_report {
        render_exit(&mut out, report);
        return out;
    }

    let _ = writeln!(
        out,
        "Block {} of {} ({} questions)",
        snapshot.current_block + 1,
        snapshot.total_blocks,
        snapshot.questions.len()
    );
    for q in &snapshot.questions {
        let _ = writeln!(out, "\n{:02}. {}", q.number, q.prompt);
        for (i, option) in q.options.iter().enumerate() {
            let letter = option.letter.unwrap_or('?');
            let marker = match q.answer {
                Some(a) if a.selected_index == i && a.is_correct => "  ✅ Correct",
                Some(a) if a.selected_index == i => "  ❌ Wrong",
                _ => "",
            };
            let _ = writeln!(out, "    {letter}) {}{marker}", option.text);
        }
        if let Some(explanation) = &q.explanation {
            let _ = writeln!(out, "    Explanation: {explanation}");
        }
    }

    if let Some(notice) = &snapshot.validation {
        let _ = writeln!(out, "\n! {} ({} left)", notice.message, notice.unanswered);
    }
    if let Some(result) = &snapshot.block_result {
        let _ = writeln!(out, "\nBlock {} complete!", result.block + 1);
        let _ = writeln!(out, "  Block hits: {}", result.block_score.hits);
        let _ = writeln!(out, "  Block errors: {}", result.block_score.errors);
        let _ = writeln!(
            out,
            "  Overall: hits {} / errors {} (of {} questions)",
            result.totals.hits, result.totals.errors, result.answered
        );
        if let Some(message) = &result.message {
            let _ = writeln!(out, "  {message}");
        }
    }

    let primary = if snapshot.is_last_block { "f = finish" } else { "n = next" };
    let state = if snapshot.can_advance { "" } else { " (locked)" };
    let back = if snapshot.can_go_back { "b = back, " } else { "" };
    let _ = writeln!(out, "\n[{back}{primary}{state}, x = exit, h = help]");
    out
}

fn question_id(snapshot: &QuizSnapshot, number: usize) -> Option<QuestionId> {
    snapshot
        .questions
        .iter()
        .find(|q| q.number == number)
        .map(|q| q.id)
}

/// User-facing text for a refused action.
fn describe(err: &QuizError) -> String {
    match err {
        QuizError::Closed => "The quiz is over. Type r to restart or q to quit.".to_string(),
        QuizError::InProgress => "Restart is available after finishing or exiting.".to_string(),
        other => other.to_string(),
    }
}

async fn next_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    Ok(lines.next_line().await?)
}

/// Drive `session` from stdin until the user quits or input ends.
pub async fn run(
    mut session: QuizSession,
    mut speech: ReadAloud<ConsoleSpeech>,
    mut rng: StdRng,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render(&session.snapshot()));

    while let Some(line) = next_line(&mut lines).await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                println!("{err}. Type h for help.");
                continue;
            }
        };

        // Any action silences speech in progress.
        speech.stop();
        let snapshot = session.snapshot();
        let outcome = match command {
            Command::Answer { number, option } => match question_id(&snapshot, number) {
                Some(id) => session.answer(id, option).map(|_| ()),
                None => {
                    println!("Question {number} is not in this block.");
                    continue;
                }
            },
            Command::Speak { number, option } => {
                let question = question_id(&snapshot, number).and_then(|id| session.store().question(id));
                match (question, option) {
                    (Some(q), None) => {
                        speech.read_question(q);
                    }
                    (Some(q), Some(i)) => {
                        speech.read_option(q, i);
                    }
                    (None, _) => println!("Question {number} is not in this block."),
                }
                continue;
            }
            Command::Next => session.go_next().map(|_| ()),
            Command::Back => session.go_back().map(|_| ()),
            Command::Finish => session.finish().map(|_| ()),
            Command::Exit => {
                let confirmed = if session.phase() == QuizPhase::Exited {
                    true
                } else {
                    println!("Leave the quiz? Progress is lost but the score is shown. [y/N]");
                    next_line(&mut lines)
                        .await?
                        .is_some_and(|l| l.trim().eq_ignore_ascii_case("y"))
                };
                if let ExitOutcome::Cancelled = session.exit(&mut || confirmed) {
                    println!("Exit cancelled.");
                    continue;
                }
                Ok(())
            }
            Command::Restart => session.restart(&mut rng),
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        };

        if let Err(err) = outcome {
            println!("{}", describe(&err));
            // Rejected transitions still re-render so the validation notice shows.
            if !err.is_rejected_transition() {
                continue;
            }
        }
        println!("{}", render(&session.snapshot()));
    }

    speech.stop();
    Ok(())
}
