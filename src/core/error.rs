//! Error types for convoy with contextual messages and exit codes
//!
//! A single unified error type categorizes failures and carries an optional
//! help line shown to the user next to the message.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for convoy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Operator declined an abort-eligible prompt
  Aborted = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for convoy
#[derive(Debug)]
pub enum ConvoyError {
  /// Configuration and pin-file errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors, with optional context naming the offending path
  Io {
    source: io::Error,
    context: Option<String>,
  },

  /// The operator declined a prompt that aborts the whole run
  Aborted,

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ConvoyError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ConvoyError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ConvoyError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ConvoyError::Message { message, context, help } => ConvoyError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ConvoyError::Io { source, context } => ConvoyError::Io {
        source,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ConvoyError::Config(_) => ExitCode::User,
      ConvoyError::Git(_) => ExitCode::System,
      ConvoyError::Io { .. } => ExitCode::System,
      ConvoyError::Aborted => ExitCode::Aborted,
      ConvoyError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ConvoyError::Config(e) => e.help_message(),
      ConvoyError::Git(e) => e.help_message(),
      ConvoyError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ConvoyError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConvoyError::Config(e) => write!(f, "{}", e),
      ConvoyError::Git(e) => write!(f, "{}", e),
      ConvoyError::Io { source, context } => {
        write!(f, "I/O error: {}", source)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
      ConvoyError::Aborted => write!(f, "Aborted by operator"),
      ConvoyError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ConvoyError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ConvoyError::Io { source, .. } => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for ConvoyError {
  fn from(err: io::Error) -> Self {
    ConvoyError::Io {
      source: err,
      context: None,
    }
  }
}

impl From<String> for ConvoyError {
  fn from(msg: String) -> Self {
    ConvoyError::message(msg)
  }
}

impl From<&str> for ConvoyError {
  fn from(msg: &str) -> Self {
    ConvoyError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ConvoyError {
  fn from(err: toml_edit::TomlError) -> Self {
    ConvoyError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ConvoyError {
  fn from(err: toml_edit::de::Error) -> Self {
    ConvoyError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ConvoyError {
  fn from(err: serde_json::Error) -> Self {
    ConvoyError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ConvoyError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ConvoyError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration and pin-file errors
#[derive(Debug)]
pub enum ConfigError {
  /// Pin file not found
  PinFileNotFound { path: PathBuf },

  /// A field in convoy.toml or pins.toml has the wrong shape
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::PinFileNotFound { .. } => Some(
        "Create a pins.toml with [sources.<name>] tables and a [versions] table, or point convoy.toml's pin_file at it."
          .to_string(),
      ),
      ConfigError::InvalidField { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::PinFileNotFound { path } => {
        write!(f, "Pin file not found: {}", path.display())
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid field '{}': {}", field, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Branch does not exist on the remote
  BranchMissing { branch: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Initialize the repository first or check the path: {}",
        path.display()
      )),
      GitError::BranchMissing { branch } => Some(format!(
        "Push the '{}' branch to the remote before releasing from it.",
        branch
      )),
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::BranchMissing { branch } => {
        write!(f, "Branch '{}' does not exist on the remote", branch)
      }
    }
  }
}

/// Result type alias for convoy
pub type ConvoyResult<T> = Result<T, ConvoyError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ConvoyResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ConvoyResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ConvoyError>,
{
  fn context(self, ctx: impl Into<String>) -> ConvoyResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ConvoyResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ConvoyError) {
  eprintln!("\nError: {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("Help: {}\n", help);
  }
}
