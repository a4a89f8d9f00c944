//! Narrow semantic capability the pipeline queries.
//!
//! The validator and policy extractor only ever ask a handful of questions of
//! a compilation: what a path names, what kind of type a field has, what a
//! constant boolean expression evaluates to, how a module was declared, and
//! which methods an `impl` attaches to a type. [`SemanticModel`] is that
//! seam; `Compilation` is the only production implementation.

use std::{
  fmt::{Display, Formatter},
  path::Path,
};

use string_cache::DefaultAtom;
use syn::{Expr, Ident, Type, Visibility};

/// Interned fully-qualified path of a symbol.
///
/// Local items are rooted at `crate` (`crate::shapes::Point`), items of other
/// crates at their package name (`::autoser::auto_serialize`). Two paths that
/// resolve to the same item always produce the same id, whatever aliases or
/// imports were used to spell them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(DefaultAtom);

impl SymbolId {
  pub fn new(path: &str) -> Self {
    Self(DefaultAtom::from(path))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Display for SymbolId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// Module scope a path is resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
  pub const CRATE_ROOT: Self = Self(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
  Type,
  Value,
  Macro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
  Module,
  Struct,
  Enum,
  Union,
  TypeAlias,
  Trait,
  Const,
  Static,
  Function,
  Macro,
  Builtin,
  External,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
  pub id: SymbolId,
  pub kind: SymbolKind,
}

/// Whether a type owns its value or borrows/shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
  Value,
  Reference,
}

impl TypeKind {
  /// Folds the kinds of a composite's parts: any reference makes the whole a
  /// reference, otherwise any unresolved part leaves the whole unresolved.
  pub fn join(parts: impl IntoIterator<Item = Option<TypeKind>>) -> Option<TypeKind> {
    let mut joined = Some(TypeKind::Value);
    for part in parts {
      match part {
        Some(TypeKind::Reference) => return Some(TypeKind::Reference),
        Some(TypeKind::Value) => {}
        None => joined = None,
      }
    }
    joined
  }
}

/// A method declared in some `impl` block.
#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'a> {
  pub name: &'a Ident,
  pub file: &'a Path,
}

pub trait SemanticModel {
  /// Looks up `krate::item` by metadata name, e.g. `autoser::auto_serialize`.
  fn symbol_by_metadata_name(&self, name: &str) -> Option<SymbolId>;

  /// Resolves `path` as written in `scope`.
  fn resolve_path(&self, scope: ScopeId, path: &syn::Path, namespace: Namespace) -> Option<Symbol>;

  /// Id of the item named `name` declared directly in `scope`.
  fn declared_symbol(&self, scope: ScopeId, name: &Ident) -> SymbolId;

  /// `None` when any part of `ty` cannot be resolved. Identifiers in
  /// `type_params` are generic parameters of the enclosing item.
  fn resolve_type(&self, scope: ScopeId, ty: &Type, type_params: &[Ident]) -> Option<TypeKind>;

  /// Evaluates `expr` as a compile-time boolean, if it is one.
  fn constant_bool(&self, scope: ScopeId, expr: &Expr) -> Option<bool>;

  /// Visibility written on the `mod` item declaring `module`. `None` for the
  /// crate root and for modules no source declares.
  fn module_visibility(&self, module: &[String]) -> Option<&Visibility>;

  /// Every method of every `impl` block whose self type is `ty`.
  fn methods_of(&self, ty: &SymbolId) -> Vec<MethodRef<'_>>;
}
