//! Parsed crate sources plus the symbol table the semantic model runs on.

use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
};

use anyhow::Context;
use indexmap::IndexMap;
use syn::Ident;

use super::{
  markers::{MARKER_CRATE, RUNTIME_EXPORTS},
  semantic::{MethodRef, Namespace, ScopeId, SemanticModel, Symbol, SymbolId, TypeKind},
};

mod resolve;
mod symbols;

use resolve::Resolver;
use symbols::SymbolTable;

#[cfg(test)]
mod tests;

/// Crates every compilation can name without a manifest entry.
const IMPLICIT_CRATES: [&str; 3] = ["std", "core", "alloc"];

/// One parsed source file and the module it defines.
#[derive(Debug, Clone)]
pub struct SourceUnit {
  path: PathBuf,
  module: Vec<String>,
  source: String,
  file: syn::File,
}

impl SourceUnit {
  /// Parses `source` as the file of module `module` (`"a::b"`, or `""` for
  /// the crate root).
  pub fn parse(path: impl Into<PathBuf>, module: &str, source: impl Into<String>) -> anyhow::Result<Self> {
    let path = path.into();
    let source = source.into();
    let file = syn::parse_file(&source).with_context(|| format!("Failed to parse {}", path.display()))?;
    let module = module
      .split("::")
      .filter(|segment| !segment.is_empty())
      .map(str::to_owned)
      .collect();

    Ok(Self {
      path,
      module,
      source,
      file,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn module(&self) -> &[String] {
    &self.module
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn file(&self) -> &syn::File {
    &self.file
  }
}

/// A crate the compilation can refer to by `local_name`.
///
/// `exports` lists the root-level items of crates whose surface is known;
/// `None` marks an opaque dependency where any path is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternCrate {
  pub local_name: String,
  pub crate_name: String,
  pub exports: Option<BTreeSet<String>>,
}

impl ExternCrate {
  pub fn opaque(local_name: impl Into<String>, crate_name: impl Into<String>) -> Self {
    Self {
      local_name: local_name.into(),
      crate_name: crate_name.into(),
      exports: None,
    }
  }

  /// The `autoser` runtime, reachable as `local_name`.
  pub fn runtime(local_name: impl Into<String>) -> Self {
    Self {
      local_name: local_name.into(),
      crate_name: MARKER_CRATE.to_owned(),
      exports: Some(RUNTIME_EXPORTS.iter().map(|export| (*export).to_owned()).collect()),
    }
  }

  fn implicit() -> impl Iterator<Item = Self> {
    IMPLICIT_CRATES.into_iter().map(|name| Self::opaque(name, name))
  }
}

/// Everything the pipeline knows about the crate being generated for.
#[derive(Debug)]
pub struct Compilation {
  units: Vec<SourceUnit>,
  crates: IndexMap<String, ExternCrate>,
  symbols: SymbolTable,
}

#[bon::bon]
impl Compilation {
  #[builder]
  pub fn new(#[builder(default)] units: Vec<SourceUnit>, #[builder(default)] extern_crates: Vec<ExternCrate>) -> Self {
    let crates = ExternCrate::implicit()
      .chain(extern_crates)
      .map(|krate| (krate.local_name.clone(), krate))
      .collect();
    let symbols = SymbolTable::build(&units);

    Self { units, crates, symbols }
  }
}

impl Compilation {
  pub fn units(&self) -> &[SourceUnit] {
    &self.units
  }

  pub fn extern_crates(&self) -> impl Iterator<Item = &ExternCrate> {
    self.crates.values()
  }

  /// Scope of the module at `module`, if any source declares it.
  pub fn scope_of(&self, module: &[String]) -> Option<ScopeId> {
    self.symbols.scope_id(module)
  }

  fn resolver(&self) -> Resolver<'_> {
    Resolver::new(&self.symbols, &self.crates)
  }
}

impl SemanticModel for Compilation {
  fn symbol_by_metadata_name(&self, name: &str) -> Option<SymbolId> {
    let (crate_name, item) = name.split_once("::")?;
    let krate = self.crates.values().find(|krate| krate.crate_name == crate_name)?;
    let path = item.split("::").map(str::to_owned).collect::<Vec<_>>();
    resolve::is_exported(krate, &path).then(|| SymbolId::new(&format!("::{name}")))
  }

  fn resolve_path(&self, scope: ScopeId, path: &syn::Path, namespace: Namespace) -> Option<Symbol> {
    let mut resolver = self.resolver();
    let resolved = resolver.resolve_syn_path(scope, path, namespace)?;
    Some(resolver.symbol(&resolved))
  }

  fn declared_symbol(&self, scope: ScopeId, name: &Ident) -> SymbolId {
    self.symbols.declared(scope, name)
  }

  fn resolve_type(&self, scope: ScopeId, ty: &syn::Type, type_params: &[Ident]) -> Option<TypeKind> {
    self.resolver().type_kind(scope, ty, type_params)
  }

  fn constant_bool(&self, scope: ScopeId, expr: &syn::Expr) -> Option<bool> {
    self.resolver().constant_bool(scope, expr)
  }

  fn module_visibility(&self, module: &[String]) -> Option<&syn::Visibility> {
    let scope = self.symbols.scope_id(module)?;
    self.symbols.scope(scope).visibility.as_ref()
  }

  fn methods_of(&self, ty: &SymbolId) -> Vec<MethodRef<'_>> {
    let mut resolver = self.resolver();
    self
      .symbols
      .impls()
      .iter()
      .filter(|record| {
        let syn::Type::Path(self_ty) = &record.self_ty else {
          return false;
        };
        self_ty.qself.is_none()
          && resolver
            .resolve_syn_path(record.scope, &self_ty.path, Namespace::Type)
            .is_some_and(|resolved| resolver.symbol(&resolved).id == *ty)
      })
      .flat_map(|record| {
        let file = self.units[record.unit].path();
        record.methods.iter().map(move |name| MethodRef { name, file })
      })
      .collect()
  }
}
