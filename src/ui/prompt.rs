//! Yes/no prompting with defaults
//!
//! All release decisions flow through the `Prompter` trait so the pipeline
//! can be exercised without a terminal. The console adapter is the only
//! place that reads stdin.

use crate::core::error::{ConvoyResult, ResultExt};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Asks the operator line-oriented yes/no questions
pub trait Prompter {
  /// Ask a question; `default` is the answer for an empty line or EOF.
  fn confirm(&mut self, question: &str, default: bool) -> ConvoyResult<bool>;
}

/// Interactive prompter reading answers from stdin
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
  fn confirm(&mut self, question: &str, default: bool) -> ConvoyResult<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
      print!("{} {}? ", question, hint);
      std::io::stdout().flush().context("Failed to flush stdout")?;

      line.clear();
      let read = stdin.lock().read_line(&mut line).context("Failed to read answer")?;
      if read == 0 {
        // EOF: take the default
        return Ok(default);
      }

      match parse_answer(&line) {
        Some(answer) => return Ok(answer),
        None if line.trim().is_empty() => return Ok(default),
        None => println!("Please answer y or n."),
      }
    }
  }
}

fn parse_answer(line: &str) -> Option<bool> {
  match line.trim().to_lowercase().as_str() {
    "y" | "yes" => Some(true),
    "n" | "no" => Some(false),
    _ => None,
  }
}

/// Prompter with pre-recorded answers; panics when asked more questions than
/// it was given. Used by tests to pin down exactly which prompts happen.
pub struct ScriptedPrompter {
  answers: VecDeque<bool>,
  pub questions: Vec<String>,
}

impl ScriptedPrompter {
  pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
    Self {
      answers: answers.into_iter().collect(),
      questions: Vec::new(),
    }
  }

  /// A prompter that must never be consulted
  pub fn silent() -> Self {
    Self::new([])
  }
}

impl Prompter for ScriptedPrompter {
  fn confirm(&mut self, question: &str, _default: bool) -> ConvoyResult<bool> {
    self.questions.push(question.to_string());
    match self.answers.pop_front() {
      Some(answer) => Ok(answer),
      None => panic!("Unexpected prompt: {}", question),
    }
  }
}
