//! Operator interaction

pub mod prompt;

pub use prompt::{ConsolePrompter, Prompter, ScriptedPrompter};
