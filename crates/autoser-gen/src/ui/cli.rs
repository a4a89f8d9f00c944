use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "autoser-gen")]
#[command(author, version, about = "Generates serialization and equality impls for #[autoser] structs")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Inspect a crate without writing anything
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate fragments for every annotated struct of a crate
  Generate(GenerateCommand),
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every struct considered for generation and what happened to it
  Candidates(CrateArgs),
}

/// Locates the crate to analyze.
#[derive(Args, Debug, Clone)]
pub struct CrateArgs {
  /// Path to the crate's Cargo.toml
  #[arg(long, value_name = "FILE", default_value = "Cargo.toml")]
  pub manifest_path: PathBuf,

  /// Crate root file (defaults to src/lib.rs, then src/main.rs)
  #[arg(short, long, value_name = "FILE")]
  pub input: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  #[command(flatten)]
  pub krate: CrateArgs,

  /// Directory the fragments and their index are written to
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Fail instead of writing when generated files are out of date
  #[arg(long, default_value_t = false)]
  pub check: bool,

  /// How diagnostics are reported
  #[arg(long, value_enum, default_value = "human")]
  pub message_format: MessageFormat,

  /// Enable verbose output with per-file details
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (diagnostics only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageFormat {
  Human,
  /// One JSON object per diagnostic on stderr
  Json,
}
