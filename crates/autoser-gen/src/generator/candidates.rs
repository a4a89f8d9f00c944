use std::path::Path;

use syn::{Item, ItemStruct, ext::IdentExt};

use super::{compilation::Compilation, semantic::ScopeId};

/// A struct declaration that might carry the opt-in marker.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
  pub item: &'a ItemStruct,
  pub scope: ScopeId,
  pub module: Vec<String>,
  pub file: &'a Path,
}

impl Candidate<'_> {
  pub fn type_name(&self) -> String {
    self.item.ident.unraw().to_string()
  }

  /// `x::y::Point`, or just `Point` at the crate root.
  pub fn type_path(&self) -> String {
    self
      .module
      .iter()
      .cloned()
      .chain(std::iter::once(self.type_name()))
      .collect::<Vec<_>>()
      .join("::")
  }
}

/// Every struct, at any module depth, with at least one non-doc attribute.
///
/// Purely syntactic: whether an attribute is the marker is the validator's job.
pub fn select(compilation: &Compilation) -> Vec<Candidate<'_>> {
  let mut candidates = Vec::new();
  for unit in compilation.units() {
    let mut module = unit.module().to_vec();
    collect(compilation, unit.path(), &mut module, &unit.file().items, &mut candidates);
  }
  candidates
}

fn collect<'a>(
  compilation: &Compilation,
  file: &'a Path,
  module: &mut Vec<String>,
  items: &'a [Item],
  out: &mut Vec<Candidate<'a>>,
) {
  for item in items {
    match item {
      Item::Struct(item) if item.attrs.iter().any(|attr| !attr.path().is_ident("doc")) => {
        if let Some(scope) = compilation.scope_of(module) {
          out.push(Candidate {
            item,
            scope,
            module: module.clone(),
            file,
          });
        }
      }
      Item::Mod(item) => {
        if let Some((_, items)) = &item.content {
          module.push(item.ident.unraw().to_string());
          collect(compilation, file, module, items, out);
          module.pop();
        }
      }
      _ => {}
    }
  }
}
