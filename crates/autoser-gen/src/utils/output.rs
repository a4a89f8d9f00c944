use std::{
  collections::HashSet,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use anyhow::Context;

use crate::generator::codegen::{FILE_SUFFIX, GeneratedSource};

/// What a sync changed, or would change, on disk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputChanges {
  pub written: Vec<PathBuf>,
  pub unchanged: Vec<PathBuf>,
  pub removed: Vec<PathBuf>,
}

impl OutputChanges {
  pub fn is_clean(&self) -> bool {
    self.written.is_empty() && self.removed.is_empty()
  }
}

/// Directory that holds generated fragments and their index.
#[derive(Debug, Clone)]
pub struct OutputDir {
  root: PathBuf,
}

impl OutputDir {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Writes files whose contents changed and removes fragments no longer
  /// generated. Unchanged files keep their modification time.
  pub async fn sync<'a>(&self, files: impl IntoIterator<Item = &'a GeneratedSource>) -> anyhow::Result<OutputChanges> {
    tokio::fs::create_dir_all(&self.root)
      .await
      .with_context(|| format!("Failed to create {}", self.root.display()))?;
    self.apply(files, false).await
  }

  /// Reports what [`OutputDir::sync`] would change without touching the disk.
  pub async fn diff<'a>(&self, files: impl IntoIterator<Item = &'a GeneratedSource>) -> anyhow::Result<OutputChanges> {
    self.apply(files, true).await
  }

  async fn apply<'a>(
    &self,
    files: impl IntoIterator<Item = &'a GeneratedSource>,
    dry_run: bool,
  ) -> anyhow::Result<OutputChanges> {
    let mut changes = OutputChanges::default();
    let mut expected = HashSet::new();

    for file in files {
      let path = self.root.join(&file.file_name);
      expected.insert(file.file_name.clone());

      let current = tokio::fs::read_to_string(&path).await.ok();
      if current.as_deref() == Some(file.code.as_str()) {
        changes.unchanged.push(path);
        continue;
      }

      if !dry_run {
        tokio::fs::write(&path, &file.code)
          .await
          .with_context(|| format!("Failed to write {}", path.display()))?;
      }
      changes.written.push(path);
    }

    for stale in self.stale_fragments(&expected).await? {
      if !dry_run {
        tokio::fs::remove_file(&stale)
          .await
          .with_context(|| format!("Failed to remove {}", stale.display()))?;
      }
      changes.removed.push(stale);
    }

    Ok(changes)
  }

  async fn stale_fragments(&self, expected: &HashSet<String>) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(&self.root).await {
      Ok(entries) => entries,
      Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
      Err(err) => return Err(err).with_context(|| format!("Failed to list {}", self.root.display())),
    };

    let mut stale = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      let name = entry.file_name().to_string_lossy().into_owned();
      if name.ends_with(FILE_SUFFIX) && !expected.contains(&name) {
        stale.push(entry.path());
      }
    }
    stale.sort();
    Ok(stale)
  }
}
