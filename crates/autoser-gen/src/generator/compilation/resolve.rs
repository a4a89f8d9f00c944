use indexmap::IndexMap;
use itertools::Itertools;
use syn::{BinOp, Expr, GenericArgument, Ident, Lit, PathArguments, Type, UnOp};

use super::{
  ExternCrate,
  symbols::{Definition, SymbolTable, UseTarget, name_of},
};
use crate::generator::semantic::{Namespace, ScopeId, Symbol, SymbolId, SymbolKind, TypeKind};

/// Bound on nested alias, constant and import resolution.
const MAX_DEPTH: usize = 32;

const STD_CRATES: [&str; 3] = ["std", "core", "alloc"];

/// Standard library types that share or borrow rather than own their value.
const SHARED_POINTERS: [&str; 4] = ["Rc", "Arc", "Weak", "Cow"];

/// Types nameable in every module without an import.
const PRELUDE_TYPES: &[(&str, &str)] = &[
  ("bool", "::core::primitive::bool"),
  ("char", "::core::primitive::char"),
  ("str", "::core::primitive::str"),
  ("u8", "::core::primitive::u8"),
  ("u16", "::core::primitive::u16"),
  ("u32", "::core::primitive::u32"),
  ("u64", "::core::primitive::u64"),
  ("u128", "::core::primitive::u128"),
  ("usize", "::core::primitive::usize"),
  ("i8", "::core::primitive::i8"),
  ("i16", "::core::primitive::i16"),
  ("i32", "::core::primitive::i32"),
  ("i64", "::core::primitive::i64"),
  ("i128", "::core::primitive::i128"),
  ("isize", "::core::primitive::isize"),
  ("f32", "::core::primitive::f32"),
  ("f64", "::core::primitive::f64"),
  ("String", "::alloc::string::String"),
  ("Vec", "::alloc::vec::Vec"),
  ("Box", "::alloc::boxed::Box"),
  ("Option", "::core::option::Option"),
  ("Result", "::core::result::Result"),
];

#[derive(Debug, Clone)]
pub(super) enum Resolved<'a> {
  Module(ScopeId),
  Local {
    scope: ScopeId,
    name: &'a str,
    definition: &'a Definition,
  },
  Extern {
    krate: &'a ExternCrate,
    path: Vec<String>,
  },
  Builtin {
    id: &'static str,
  },
}

pub(super) fn is_exported(krate: &ExternCrate, path: &[String]) -> bool {
  match &krate.exports {
    None => true,
    Some(exports) => match path {
      [] => true,
      [item] => exports.contains(item),
      _ => false,
    },
  }
}

/// Name resolution over one [`SymbolTable`].
///
/// Lookups in progress are tracked so that cyclic imports resolve to nothing
/// instead of recursing forever.
pub(super) struct Resolver<'a> {
  symbols: &'a SymbolTable,
  crates: &'a IndexMap<String, ExternCrate>,
  visiting: Vec<(ScopeId, String, Namespace)>,
  depth: usize,
}

impl<'a> Resolver<'a> {
  pub(super) fn new(symbols: &'a SymbolTable, crates: &'a IndexMap<String, ExternCrate>) -> Self {
    Self {
      symbols,
      crates,
      visiting: Vec::new(),
      depth: 0,
    }
  }

  pub(super) fn symbol(&self, resolved: &Resolved<'_>) -> Symbol {
    match resolved {
      Resolved::Module(scope) => Symbol {
        id: SymbolId::new(&self.symbols.scope(*scope).qualified_name()),
        kind: SymbolKind::Module,
      },
      Resolved::Local {
        scope,
        name,
        definition,
      } => Symbol {
        id: SymbolId::new(&format!("{}::{name}", self.symbols.scope(*scope).qualified_name())),
        kind: definition.kind(),
      },
      Resolved::Extern { krate, path } => Symbol {
        id: SymbolId::new(&format!(
          "::{}",
          std::iter::once(krate.crate_name.as_str())
            .chain(path.iter().map(String::as_str))
            .join("::")
        )),
        kind: SymbolKind::External,
      },
      Resolved::Builtin { id } => Symbol {
        id: SymbolId::new(id),
        kind: SymbolKind::Builtin,
      },
    }
  }

  pub(super) fn resolve_syn_path(
    &mut self,
    scope: ScopeId,
    path: &syn::Path,
    namespace: Namespace,
  ) -> Option<Resolved<'a>> {
    let segments = path.segments.iter().map(|segment| name_of(&segment.ident)).collect::<Vec<_>>();
    self.resolve(scope, path.leading_colon.is_some(), &segments, namespace)
  }

  fn resolve_target(&mut self, scope: ScopeId, target: &UseTarget, namespace: Namespace) -> Option<Resolved<'a>> {
    self.resolve(scope, target.leading_colon, &target.segments, namespace)
  }

  fn resolve(
    &mut self,
    scope: ScopeId,
    leading_colon: bool,
    segments: &[String],
    namespace: Namespace,
  ) -> Option<Resolved<'a>> {
    let crates = self.crates;
    let mut current: Option<Resolved<'a>> = None;
    for (index, segment) in segments.iter().enumerate() {
      let segment_namespace = if index + 1 == segments.len() {
        namespace
      } else {
        Namespace::Type
      };

      current = Some(match current {
        None if leading_colon => Resolved::Extern {
          krate: crates.get(segment.as_str())?,
          path: Vec::new(),
        },
        None => match segment.as_str() {
          "crate" => Resolved::Module(ScopeId::CRATE_ROOT),
          "self" => Resolved::Module(scope),
          "super" => Resolved::Module(self.symbols.scope(scope).parent?),
          name => self.lookup(scope, name, segment_namespace, true)?,
        },
        Some(parent) => self.member(parent, segment, segment_namespace)?,
      });
    }
    current
  }

  fn member(&mut self, parent: Resolved<'a>, name: &str, namespace: Namespace) -> Option<Resolved<'a>> {
    match parent {
      Resolved::Module(scope) => match name {
        "self" => Some(Resolved::Module(scope)),
        "super" => self.symbols.scope(scope).parent.map(Resolved::Module),
        _ => self.lookup(scope, name, namespace, false),
      },
      Resolved::Extern { krate, mut path } => {
        path.push(name.to_owned());
        is_exported(krate, &path).then_some(Resolved::Extern { krate, path })
      }
      Resolved::Local { .. } | Resolved::Builtin { .. } => None,
    }
  }

  /// Looks `name` up in `scope`. Only the first segment of a path (`lexical`)
  /// also sees the extern prelude and the builtin types.
  fn lookup(&mut self, scope: ScopeId, name: &str, namespace: Namespace, lexical: bool) -> Option<Resolved<'a>> {
    let key = (scope, name.to_owned(), namespace);
    if self.visiting.contains(&key) || self.visiting.len() >= MAX_DEPTH {
      return None;
    }

    self.visiting.push(key);
    let found = self.lookup_in_scope(scope, name, namespace, lexical);
    self.visiting.pop();
    found
  }

  fn lookup_in_scope(
    &mut self,
    scope: ScopeId,
    name: &str,
    namespace: Namespace,
    lexical: bool,
  ) -> Option<Resolved<'a>> {
    let symbols = self.symbols;
    let crates = self.crates;
    let module = symbols.scope(scope);

    if let Some(((_, local), definition)) = module.definitions.get_key_value(&(namespace, name.to_owned())) {
      return Some(match definition {
        Definition::Module(child) => Resolved::Module(*child),
        _ => Resolved::Local {
          scope,
          name: local.as_str(),
          definition,
        },
      });
    }

    for target in module.imports.get(name).into_iter().flatten() {
      if let Some(found) = self.resolve_target(scope, target, namespace) {
        return Some(found);
      }
    }

    for glob in &module.globs {
      if let Some(source) = self.resolve_target(scope, glob, Namespace::Type)
        && let Some(found) = self.member(source, name, namespace)
      {
        return Some(found);
      }
    }

    if !lexical || namespace != Namespace::Type {
      return None;
    }

    if let Some(krate) = crates.get(name) {
      return Some(Resolved::Extern {
        krate,
        path: Vec::new(),
      });
    }
    if let Some(target) = symbols.extern_alias(name) {
      return self.resolve_target(ScopeId::CRATE_ROOT, target, namespace);
    }
    PRELUDE_TYPES
      .iter()
      .find(|(builtin, _)| *builtin == name)
      .map(|&(_, id)| Resolved::Builtin { id })
  }

  pub(super) fn type_kind(&mut self, scope: ScopeId, ty: &Type, type_params: &[Ident]) -> Option<TypeKind> {
    match ty {
      Type::Reference(_) | Type::Ptr(_) => Some(TypeKind::Reference),
      Type::Paren(inner) => self.type_kind(scope, &inner.elem, type_params),
      Type::Group(inner) => self.type_kind(scope, &inner.elem, type_params),
      Type::Array(inner) => self.type_kind(scope, &inner.elem, type_params),
      Type::Slice(inner) => self.type_kind(scope, &inner.elem, type_params),
      Type::Tuple(tuple) => {
        let parts = tuple
          .elems
          .iter()
          .map(|elem| self.type_kind(scope, elem, type_params))
          .collect::<Vec<_>>();
        TypeKind::join(parts)
      }
      Type::Path(path) if path.qself.is_none() => self.path_kind(scope, &path.path, type_params),
      _ => None,
    }
  }

  fn path_kind(&mut self, scope: ScopeId, path: &syn::Path, type_params: &[Ident]) -> Option<TypeKind> {
    let arguments = generic_type_arguments(path)
      .map(|argument| self.type_kind(scope, argument, type_params))
      .collect::<Vec<_>>();

    if let Some(ident) = path.get_ident()
      && (ident == "Self" || type_params.contains(ident))
    {
      return TypeKind::join(arguments);
    }

    let own = match self.resolve_syn_path(scope, path, Namespace::Type)? {
      Resolved::Local {
        scope: alias_scope,
        definition: Definition::TypeAlias { ty, params },
        ..
      } => self.nested(|resolver| resolver.type_kind(alias_scope, ty, params))?,
      Resolved::Local {
        definition: Definition::Item(SymbolKind::Struct | SymbolKind::Enum | SymbolKind::Union),
        ..
      }
      | Resolved::Builtin { .. } => TypeKind::Value,
      Resolved::Extern { krate, path } if is_shared_pointer(krate, &path) => TypeKind::Reference,
      Resolved::Extern { .. } => TypeKind::Value,
      Resolved::Local { .. } | Resolved::Module(_) => return None,
    };

    TypeKind::join(std::iter::once(Some(own)).chain(arguments))
  }

  pub(super) fn constant_bool(&mut self, scope: ScopeId, expr: &Expr) -> Option<bool> {
    match expr {
      Expr::Lit(literal) => match &literal.lit {
        Lit::Bool(value) => Some(value.value),
        _ => None,
      },
      Expr::Paren(inner) => self.constant_bool(scope, &inner.expr),
      Expr::Group(inner) => self.constant_bool(scope, &inner.expr),
      Expr::Unary(unary) => match unary.op {
        UnOp::Not(_) => self.constant_bool(scope, &unary.expr).map(|value| !value),
        _ => None,
      },
      Expr::Binary(binary) => {
        let left = self.constant_bool(scope, &binary.left)?;
        let right = self.constant_bool(scope, &binary.right)?;
        match binary.op {
          BinOp::And(_) | BinOp::BitAnd(_) => Some(left && right),
          BinOp::Or(_) | BinOp::BitOr(_) => Some(left || right),
          BinOp::BitXor(_) | BinOp::Ne(_) => Some(left != right),
          BinOp::Eq(_) => Some(left == right),
          _ => None,
        }
      }
      Expr::Path(path) if path.qself.is_none() => match self.resolve_syn_path(scope, &path.path, Namespace::Value)? {
        Resolved::Local {
          scope: const_scope,
          definition: Definition::Const { ty, expr },
          ..
        } if is_bool(ty) => self.nested(|resolver| resolver.constant_bool(const_scope, expr)),
        _ => None,
      },
      _ => None,
    }
  }

  fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
    if self.depth >= MAX_DEPTH {
      return None;
    }
    self.depth += 1;
    let result = f(self);
    self.depth -= 1;
    result
  }
}

fn generic_type_arguments(path: &syn::Path) -> impl Iterator<Item = &Type> {
  path
    .segments
    .last()
    .into_iter()
    .filter_map(|segment| match &segment.arguments {
      PathArguments::AngleBracketed(arguments) => Some(arguments.args.iter()),
      _ => None,
    })
    .flatten()
    .filter_map(|argument| match argument {
      GenericArgument::Type(ty) => Some(ty),
      _ => None,
    })
}

fn is_shared_pointer(krate: &ExternCrate, path: &[String]) -> bool {
  STD_CRATES.contains(&krate.crate_name.as_str())
    && path
      .last()
      .is_some_and(|name| SHARED_POINTERS.contains(&name.as_str()))
}

fn is_bool(ty: &Type) -> bool {
  matches!(ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident("bool"))
}
