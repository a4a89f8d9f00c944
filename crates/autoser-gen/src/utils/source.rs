use std::{
  collections::VecDeque,
  path::{Path, PathBuf},
};

use anyhow::Context;
use syn::{Expr, ExprLit, Item, Lit, Meta, ext::IdentExt};

use crate::generator::compilation::SourceUnit;

/// Source units reachable from a crate root.
#[derive(Debug, Default)]
pub struct LoadedCrate {
  pub units: Vec<SourceUnit>,
  /// Modules declared with `mod name;` whose file does not exist, usually
  /// because they are behind a `cfg` that points elsewhere.
  pub missing_modules: Vec<String>,
}

struct PendingModule {
  file: PathBuf,
  module: Vec<String>,
  /// Directory that `mod child;` declarations in `file` resolve against.
  child_dir: PathBuf,
}

struct ModuleDeclaration {
  module: Vec<String>,
  candidates: Vec<PathBuf>,
  explicit_path: bool,
}

/// `src/lib.rs` if present, otherwise `src/main.rs`.
pub async fn default_root(manifest_dir: &Path) -> anyhow::Result<PathBuf> {
  for candidate in ["src/lib.rs", "src/main.rs"] {
    let path = manifest_dir.join(candidate);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
      return Ok(path);
    }
  }
  anyhow::bail!("No src/lib.rs or src/main.rs found under {}", manifest_dir.display())
}

/// Parses `root_file` and every file reachable through `mod name;`.
pub async fn load_crate(root_file: &Path) -> anyhow::Result<LoadedCrate> {
  let root_dir = root_file.parent().map(Path::to_path_buf).unwrap_or_default();
  let mut pending = VecDeque::from([PendingModule {
    file: root_file.to_path_buf(),
    module: Vec::new(),
    child_dir: root_dir,
  }]);
  let mut loaded = LoadedCrate::default();

  while let Some(next) = pending.pop_front() {
    let source = tokio::fs::read_to_string(&next.file)
      .await
      .with_context(|| format!("Failed to read {}", next.file.display()))?;
    let unit = SourceUnit::parse(&next.file, &next.module.join("::"), source)?;

    let file_dir = next.file.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut declarations = Vec::new();
    collect_declarations(
      &unit.file().items,
      &next.module,
      &next.child_dir,
      &file_dir,
      &mut declarations,
    );

    for declaration in declarations {
      match locate(&declaration).await {
        Some(found) => pending.push_back(found),
        None => loaded.missing_modules.push(declaration.module.join("::")),
      }
    }
    loaded.units.push(unit);
  }

  Ok(loaded)
}

fn collect_declarations(
  items: &[Item],
  module: &[String],
  child_dir: &Path,
  file_dir: &Path,
  out: &mut Vec<ModuleDeclaration>,
) {
  for item in items {
    let Item::Mod(item) = item else {
      continue;
    };

    let name = item.ident.unraw().to_string();
    let mut child = module.to_vec();
    child.push(name.clone());

    if let Some((_, items)) = &item.content {
      collect_declarations(items, &child, &child_dir.join(&name), file_dir, out);
      continue;
    }

    let declaration = match path_attribute(item) {
      Some(path) => ModuleDeclaration {
        module: child,
        candidates: vec![file_dir.join(path)],
        explicit_path: true,
      },
      None => ModuleDeclaration {
        module: child,
        candidates: vec![child_dir.join(format!("{name}.rs")), child_dir.join(&name).join("mod.rs")],
        explicit_path: false,
      },
    };
    out.push(declaration);
  }
}

fn path_attribute(item: &syn::ItemMod) -> Option<String> {
  item.attrs.iter().find_map(|attr| match &attr.meta {
    Meta::NameValue(name_value) if name_value.path.is_ident("path") => match &name_value.value {
      Expr::Lit(ExprLit { lit: Lit::Str(path), .. }) => Some(path.value()),
      _ => None,
    },
    _ => None,
  })
}

async fn locate(declaration: &ModuleDeclaration) -> Option<PendingModule> {
  for candidate in &declaration.candidates {
    if !tokio::fs::try_exists(candidate).await.unwrap_or(false) {
      continue;
    }

    let is_mod_rs = candidate.file_name().is_some_and(|name| name == "mod.rs");
    let child_dir = if is_mod_rs || declaration.explicit_path {
      candidate.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
      candidate.with_extension("")
    };

    return Some(PendingModule {
      file: candidate.clone(),
      module: declaration.module.clone(),
      child_dir,
    });
  }
  None
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
  }

  fn modules(loaded: &LoadedCrate) -> Vec<String> {
    let mut modules = loaded
      .units
      .iter()
      .map(|unit| unit.module().join("::"))
      .collect::<Vec<_>>();
    modules.sort();
    modules
  }

  #[tokio::test]
  async fn test_follows_file_and_directory_modules() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/lib.rs", "mod shapes;\nmod io;\n");
    write(dir.path(), "src/shapes.rs", "pub mod circle;\n");
    write(dir.path(), "src/shapes/circle.rs", "pub struct Circle;\n");
    write(dir.path(), "src/io/mod.rs", "mod reader;\n");
    write(dir.path(), "src/io/reader.rs", "pub struct Reader;\n");

    let loaded = load_crate(&dir.path().join("src/lib.rs")).await.unwrap();

    assert_eq!(modules(&loaded), ["", "io", "io::reader", "shapes", "shapes::circle"]);
    assert!(loaded.missing_modules.is_empty());
  }

  #[tokio::test]
  async fn test_inline_modules_nest_out_of_line_children() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/lib.rs", "mod outer { mod inner; }\n");
    write(dir.path(), "src/outer/inner.rs", "pub struct Inner;\n");

    let loaded = load_crate(&dir.path().join("src/lib.rs")).await.unwrap();

    assert_eq!(modules(&loaded), ["", "outer::inner"]);
  }

  #[tokio::test]
  async fn test_path_attribute_overrides_lookup() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/lib.rs", "#[path = \"generated/model.rs\"]\nmod model;\n");
    write(dir.path(), "src/generated/model.rs", "pub struct Model;\n");

    let loaded = load_crate(&dir.path().join("src/lib.rs")).await.unwrap();

    assert_eq!(modules(&loaded), ["", "model"]);
  }

  #[tokio::test]
  async fn test_missing_module_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/lib.rs", "#[cfg(windows)]\nmod windows;\n");

    let loaded = load_crate(&dir.path().join("src/lib.rs")).await.unwrap();

    assert_eq!(modules(&loaded), [""]);
    assert_eq!(loaded.missing_modules, ["windows"]);
  }

  #[tokio::test]
  async fn test_default_root_prefers_library() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/main.rs", "fn main() {}\n");
    assert_eq!(default_root(dir.path()).await.unwrap(), dir.path().join("src/main.rs"));

    write(dir.path(), "src/lib.rs", "\n");
    assert_eq!(default_root(dir.path()).await.unwrap(), dir.path().join("src/lib.rs"));
  }

  #[tokio::test]
  async fn test_default_root_requires_a_target() {
    let dir = tempfile::tempdir().unwrap();
    assert!(default_root(dir.path()).await.is_err());
  }

  #[tokio::test]
  async fn test_unparsable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/lib.rs", "struct {");

    let err = load_crate(&dir.path().join("src/lib.rs")).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse"), "{err:#}");
  }
}
