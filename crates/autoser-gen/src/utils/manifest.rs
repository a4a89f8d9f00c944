use std::{collections::HashSet, path::Path};

use anyhow::Context;
use toml_edit::{Document, Item};

use crate::generator::{compilation::ExternCrate, markers::MARKER_CRATE};

/// A dependency as the crate's source sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
  /// Name usable in paths, after any `package =` rename.
  pub name: String,
  pub package: String,
}

/// The parts of a `Cargo.toml` the generator cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
  dependencies: Vec<Dependency>,
}

impl Manifest {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let text = tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    Self::parse(&text).with_context(|| format!("Failed to parse manifest {}", path.display()))
  }

  /// Reads `[dependencies]` and every `[target.'cfg(..)'.dependencies]`.
  pub fn parse(text: &str) -> anyhow::Result<Self> {
    let document = Document::parse(text.to_owned())?;
    let mut dependencies = Vec::new();

    if let Some(table) = document.get("dependencies") {
      collect_dependencies(table, &mut dependencies);
    }

    if let Some(targets) = document.get("target").and_then(Item::as_table_like) {
      for (_, target) in targets.iter() {
        if let Some(table) = target.get("dependencies") {
          collect_dependencies(table, &mut dependencies);
        }
      }
    }

    let mut seen = HashSet::new();
    dependencies.retain(|dependency| seen.insert(dependency.name.clone()));

    Ok(Self { dependencies })
  }

  pub fn dependencies(&self) -> &[Dependency] {
    &self.dependencies
  }

  pub fn depends_on(&self, package: &str) -> bool {
    self.dependencies.iter().any(|dependency| dependency.package == package)
  }

  /// The runtime crate with its known surface; everything else opaque.
  pub fn extern_crates(&self) -> Vec<ExternCrate> {
    self
      .dependencies
      .iter()
      .map(|dependency| {
        if dependency.package == MARKER_CRATE {
          ExternCrate::runtime(&dependency.name)
        } else {
          ExternCrate::opaque(&dependency.name, &dependency.package)
        }
      })
      .collect()
  }
}

fn collect_dependencies(item: &Item, out: &mut Vec<Dependency>) {
  let Some(table) = item.as_table_like() else {
    return;
  };

  for (key, value) in table.iter() {
    let package = value.get("package").and_then(Item::as_str).unwrap_or(key);
    out.push(Dependency {
      name: crate_name(key),
      package: crate_name(package),
    });
  }
}

/// Cargo package names may use `-`; crate names in source never do.
fn crate_name(package: &str) -> String {
  package.replace('-', "_")
}
