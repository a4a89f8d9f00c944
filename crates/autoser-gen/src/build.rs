//! Running the generator from a build script.
//!
//! ```no_run
//! // build.rs
//! fn main() -> anyhow::Result<()> {
//!   autoser_gen::build::generate()
//! }
//! ```
//!
//! The crate root then pulls every fragment in with
//! `include!(env!("AUTOSER_INDEX"));`.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
  generator::{
    codegen::INDEX_FILE,
    diagnostics::Diagnostic,
    orchestrator::{GeneratedOutput, Orchestrator},
  },
  utils::{output::OutputDir, source::default_root},
};

/// Subdirectory of `OUT_DIR` holding generated files.
pub const OUT_SUBDIR: &str = "autoser";

/// Compile-time variable holding the path of the index file.
pub const INDEX_ENV: &str = "AUTOSER_INDEX";

/// Generates fragments for the crate being built. Diagnostics become cargo
/// warnings; any error diagnostic fails the build.
pub fn generate() -> anyhow::Result<()> {
  let manifest_dir = env_path("CARGO_MANIFEST_DIR")?;
  let out_root = env_path("OUT_DIR")?;
  let out_dir = out_root.join(OUT_SUBDIR);

  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to start runtime")?;
  let output = runtime.block_on(run(&manifest_dir, &out_dir, &mut |line| println!("{line}")))?;

  if output.has_errors() {
    anyhow::bail!("autoser-gen reported {} error(s)", output.stats.errors);
  }
  println!("{}", index_env_line(&out_root));
  Ok(())
}

fn index_env_line(out_root: &Path) -> String {
  format!("cargo:rustc-env={INDEX_ENV}={}", index_path(out_root).display())
}

fn env_path(name: &str) -> anyhow::Result<PathBuf> {
  std::env::var_os(name)
    .map(PathBuf::from)
    .with_context(|| format!("{name} is not set; generate() must run inside a build script"))
}

async fn run(manifest_dir: &Path, out_dir: &Path, emit: &mut dyn FnMut(String)) -> anyhow::Result<GeneratedOutput> {
  let manifest_path = manifest_dir.join("Cargo.toml");
  let root_file = default_root(manifest_dir).await?;
  let orchestrator = Orchestrator::load(&manifest_path, &root_file).await?;

  emit(format!("cargo:rerun-if-changed={}", manifest_path.display()));
  for unit in orchestrator.compilation().units() {
    emit(format!("cargo:rerun-if-changed={}", unit.path().display()));
  }

  for module in orchestrator.missing_modules() {
    emit(format!("cargo:warning=module `{module}` has no source file and was not scanned"));
  }

  let output = orchestrator.generate()?;
  for diagnostic in &output.diagnostics {
    emit(format!("cargo:warning={}", single_line(diagnostic)));
  }

  OutputDir::new(out_dir).sync(output.all_files()).await?;
  Ok(output)
}

/// Cargo warnings are one line each.
fn single_line(diagnostic: &Diagnostic) -> String {
  format!(
    "{}: {}[{}]: {}",
    diagnostic.location, diagnostic.severity, diagnostic.code, diagnostic.message
  )
}

/// Path of the index file under `out_dir`.
pub fn index_path(out_dir: &Path) -> PathBuf {
  out_dir.join(OUT_SUBDIR).join(INDEX_FILE)
}
