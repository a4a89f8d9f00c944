#![allow(clippy::struct_excessive_bools)]

use std::path::{Path, PathBuf};

use crate::{ui::CrateArgs, utils::source::default_root};

pub mod generate;
pub mod list;

pub use generate::{GenerateConfig, generate_code};
pub use list::list_candidates;

/// Directory containing the manifest; `.` for a bare `Cargo.toml`.
fn manifest_dir(manifest_path: &Path) -> PathBuf {
  match manifest_path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  }
}

async fn root_file(manifest_path: &Path, input: Option<&Path>) -> anyhow::Result<PathBuf> {
  match input {
    Some(input) => Ok(input.to_path_buf()),
    None => default_root(&manifest_dir(manifest_path)).await,
  }
}

impl CrateArgs {
  pub async fn root_file(&self) -> anyhow::Result<PathBuf> {
    root_file(&self.manifest_path, self.input.as_deref()).await
  }
}
