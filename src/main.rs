use clap::{Parser, Subcommand};
use convoy::commands;
use convoy::core::error::{ConvoyError, print_error};
use std::path::PathBuf;

/// Coordinate releases across many pinned distribution checkouts
#[derive(Parser)]
#[command(name = "convoy")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct ConvoyCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Release every distribution with unreleased changes
  Release {
    /// Parent project root (default: current directory)
    #[arg(long)]
    path: Option<PathBuf>,
    /// Walk all stages and report, but release nothing and write nothing
    #[arg(long)]
    dry_run: bool,
    /// Comma-separated name fragments; only matching distributions are considered
    #[arg(short, long)]
    filter: Option<String>,
    /// Print the per-distribution run report as JSON
    #[arg(long)]
    json: bool,
  },

  /// Prepend draft changelog entries from git history to CHANGES.rst
  Changelog {
    /// Distribution checkout to update
    path: PathBuf,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = ConvoyCli::parse();

  let result = match cli.command {
    Commands::Release {
      path,
      dry_run,
      filter,
      json,
    } => commands::run_release(path, dry_run, filter, json),
    Commands::Changelog { path } => commands::run_changelog(&path),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ConvoyError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
