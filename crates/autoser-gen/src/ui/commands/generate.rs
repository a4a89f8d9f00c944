use std::path::{Path, PathBuf};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    diagnostics::{Diagnostic, Severity},
    metrics::GenerationStats,
    orchestrator::Orchestrator,
  },
  ui::{Colors, CrateArgs, GenerateCommand, MessageFormat},
  utils::output::{OutputChanges, OutputDir},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub krate: CrateArgs,
  pub output: PathBuf,
  pub check: bool,
  pub message_format: MessageFormat,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      krate,
      output,
      check,
      message_format,
      verbose,
      quiet,
    } = command;

    if verbose && quiet {
      anyhow::bail!("--verbose and --quiet cannot be combined");
    }

    Ok(Self {
      krate,
      output,
      check,
      message_format,
      verbose,
      quiet,
    })
  }
}

/// Renders one diagnostic for stderr.
fn format_diagnostic(diagnostic: &Diagnostic, format: MessageFormat, colors: &Colors) -> anyhow::Result<String> {
  if format == MessageFormat::Json {
    return Ok(serde_json::to_string(diagnostic)?);
  }

  let color = match diagnostic.severity {
    Severity::Error => colors.error(),
    Severity::Warning => colors.warning(),
  };
  Ok(format!(
    "{}: {}\n  {} {}",
    format!("{}[{}]", diagnostic.severity, diagnostic.code).with(color).bold(),
    diagnostic.message,
    "-->".with(colors.accent()),
    diagnostic.location.to_string().with(colors.timestamp()),
  ))
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn detail(&self, label: &str, value: String) {
    if self.config.verbose {
      self.stat(label, value);
    }
  }

  fn log_loading(&self, root_file: &Path) {
    self.info(
      &format!("Loading crate from: {}", root_file.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_missing_modules(&self, modules: &[String]) {
    for module in modules {
      self.info(
        &format!("Module `{module}` has no source file; skipping")
          .with(self.colors.warning())
          .to_string(),
      );
    }
  }

  fn log_generating(&self) {
    self.info(&"Generating serialization impls...".with(self.colors.primary()).to_string());
  }

  /// Diagnostics are printed even with `--quiet`.
  fn print_diagnostics(&self, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
    for diagnostic in diagnostics {
      eprintln!(
        "{}",
        format_diagnostic(diagnostic, self.config.message_format, self.colors)?
      );
    }
    Ok(())
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Candidates scanned:", stats.candidates_scanned.to_string());
    self.detail("", format!("{} not marked", stats.candidates_unmarked));
    self.detail("", format!("{} without serializable fields", stats.candidates_empty));
    self.stat("Structs generated:", stats.structs_generated.to_string());
    self.stat("", format!("{} with equality", stats.equality_impls_generated));
    self.stat("Fields serialized:", stats.fields_serialized.to_string());
    self.stat("Fields excluded:", stats.fields_excluded.to_string());
    self.detail("", format!("{} reference types", stats.reference_fields));
    self.detail("", format!("{} unresolved types", stats.unresolved_fields));

    if stats.candidates_rejected > 0 {
      self.stat("Rejected:", stats.candidates_rejected.to_string());
    }
    if stats.errors > 0 || stats.warnings > 0 {
      self.stat("Diagnostics:", format!("{} errors, {} warnings", stats.errors, stats.warnings));
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_changes(&self, changes: &OutputChanges) {
    if !self.config.verbose {
      return;
    }

    let verb = if self.config.check { "stale" } else { "wrote" };
    for path in &changes.written {
      println!("              {} {}", verb.with(self.colors.accent()), path.display());
    }
    for path in &changes.removed {
      println!("              {} {}", "removed".with(self.colors.warning()), path.display());
    }
  }

  fn log_success(&self, changes: &OutputChanges) {
    if self.config.quiet {
      return;
    }

    let message = if self.config.check {
      "Generated files are up to date".to_string()
    } else {
      format!(
        "Updated {} files, {} unchanged, {} removed",
        changes.written.len(),
        changes.unchanged.len(),
        changes.removed.len()
      )
    };
    println!();
    println!(
      "{} {}",
      format_timestamp().with(self.colors.timestamp()),
      message.with(self.colors.success())
    );
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  let root_file = config.krate.root_file().await?;
  logger.log_loading(&root_file);
  let orchestrator = Orchestrator::load(&config.krate.manifest_path, &root_file).await?;
  logger.log_missing_modules(orchestrator.missing_modules());

  logger.log_generating();
  let output = orchestrator.generate()?;
  logger.print_diagnostics(&output.diagnostics)?;
  logger.print_statistics(&output.stats);

  let directory = OutputDir::new(&config.output);
  let changes = if config.check {
    directory.diff(output.all_files()).await?
  } else {
    logger.log_writing();
    directory.sync(output.all_files()).await?
  };
  logger.log_changes(&changes);

  if output.has_errors() {
    anyhow::bail!("generation failed with {} error(s)", output.stats.errors);
  }
  if config.check && !changes.is_clean() {
    anyhow::bail!(
      "generated files in {} are out of date; rerun without --check",
      config.output.display()
    );
  }

  logger.log_success(&changes);
  Ok(())
}
