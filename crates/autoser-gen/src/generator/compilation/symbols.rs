use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use syn::{Expr, Ident, ImplItem, Item, Type, UseTree, Visibility, ext::IdentExt};

use super::SourceUnit;
use crate::generator::semantic::{Namespace, ScopeId, SymbolId, SymbolKind};

pub(super) fn name_of(ident: &Ident) -> String {
  ident.unraw().to_string()
}

/// Path written in a `use` item or `extern crate` alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct UseTarget {
  pub(super) leading_colon: bool,
  pub(super) segments: Vec<String>,
}

#[derive(Debug)]
pub(super) enum Definition {
  Module(ScopeId),
  Item(SymbolKind),
  TypeAlias { ty: Type, params: Vec<Ident> },
  Const { ty: Type, expr: Expr },
}

impl Definition {
  pub(super) fn kind(&self) -> SymbolKind {
    match self {
      Self::Module(_) => SymbolKind::Module,
      Self::Item(kind) => *kind,
      Self::TypeAlias { .. } => SymbolKind::TypeAlias,
      Self::Const { .. } => SymbolKind::Const,
    }
  }
}

#[derive(Debug, Default)]
pub(super) struct Scope {
  pub(super) path: Vec<String>,
  pub(super) parent: Option<ScopeId>,
  /// Visibility on the `mod` item that declares this module, if one was seen.
  pub(super) visibility: Option<Visibility>,
  pub(super) definitions: IndexMap<(Namespace, String), Definition>,
  pub(super) imports: IndexMap<String, Vec<UseTarget>>,
  pub(super) globs: Vec<UseTarget>,
}

impl Scope {
  pub(super) fn qualified_name(&self) -> String {
    std::iter::once("crate").chain(self.path.iter().map(String::as_str)).join("::")
  }
}

#[derive(Debug)]
pub(super) struct ImplRecord {
  pub(super) scope: ScopeId,
  pub(super) unit: usize,
  pub(super) self_ty: Type,
  pub(super) methods: Vec<Ident>,
}

/// Module tree of a compilation, built from the syntax of every unit.
#[derive(Debug)]
pub(super) struct SymbolTable {
  scopes: Vec<Scope>,
  index: HashMap<Vec<String>, ScopeId>,
  impls: Vec<ImplRecord>,
  /// `extern crate x as y;` at the crate root adds `y` to every module's prelude.
  extern_aliases: IndexMap<String, UseTarget>,
}

impl SymbolTable {
  pub(super) fn build(units: &[SourceUnit]) -> Self {
    let mut table = Self {
      scopes: vec![Scope::default()],
      index: HashMap::from([(Vec::new(), ScopeId::CRATE_ROOT)]),
      impls: Vec::new(),
      extern_aliases: IndexMap::new(),
    };

    for (unit, source) in units.iter().enumerate() {
      let scope = table.scope_for(source.module());
      table.collect_items(unit, scope, &source.file().items);
    }

    table
  }

  pub(super) fn scope(&self, id: ScopeId) -> &Scope {
    &self.scopes[id.0]
  }

  pub(super) fn scope_id(&self, path: &[String]) -> Option<ScopeId> {
    self.index.get(path).copied()
  }

  pub(super) fn impls(&self) -> &[ImplRecord] {
    &self.impls
  }

  pub(super) fn extern_alias(&self, name: &str) -> Option<&UseTarget> {
    self.extern_aliases.get(name)
  }

  pub(super) fn declared(&self, scope: ScopeId, name: &Ident) -> SymbolId {
    SymbolId::new(&format!("{}::{}", self.scope(scope).qualified_name(), name_of(name)))
  }

  fn scope_for(&mut self, path: &[String]) -> ScopeId {
    if let Some(id) = self.scope_id(path) {
      return id;
    }

    let Some((name, parent_path)) = path.split_last() else {
      return ScopeId::CRATE_ROOT;
    };
    let parent = self.scope_for(parent_path);
    let id = ScopeId(self.scopes.len());
    self.scopes.push(Scope {
      path: path.to_vec(),
      parent: Some(parent),
      ..Scope::default()
    });
    self.index.insert(path.to_vec(), id);
    self.scopes[parent.0]
      .definitions
      .entry((Namespace::Type, name.clone()))
      .or_insert(Definition::Module(id));
    id
  }

  fn define(&mut self, scope: ScopeId, namespace: Namespace, ident: &Ident, definition: Definition) {
    self.scopes[scope.0]
      .definitions
      .entry((namespace, name_of(ident)))
      .or_insert(definition);
  }

  fn import(&mut self, scope: ScopeId, name: String, target: UseTarget) {
    self.scopes[scope.0].imports.entry(name).or_default().push(target);
  }

  fn collect_items(&mut self, unit: usize, scope: ScopeId, items: &[Item]) {
    for item in items {
      match item {
        Item::Struct(item) => self.define(scope, Namespace::Type, &item.ident, Definition::Item(SymbolKind::Struct)),
        Item::Enum(item) => self.define(scope, Namespace::Type, &item.ident, Definition::Item(SymbolKind::Enum)),
        Item::Union(item) => self.define(scope, Namespace::Type, &item.ident, Definition::Item(SymbolKind::Union)),
        Item::Trait(item) => self.define(scope, Namespace::Type, &item.ident, Definition::Item(SymbolKind::Trait)),
        Item::TraitAlias(item) => self.define(scope, Namespace::Type, &item.ident, Definition::Item(SymbolKind::Trait)),
        Item::Type(item) => self.define(
          scope,
          Namespace::Type,
          &item.ident,
          Definition::TypeAlias {
            ty: (*item.ty).clone(),
            params: item.generics.type_params().map(|param| param.ident.clone()).collect(),
          },
        ),
        Item::Const(item) => self.define(
          scope,
          Namespace::Value,
          &item.ident,
          Definition::Const {
            ty: (*item.ty).clone(),
            expr: (*item.expr).clone(),
          },
        ),
        Item::Static(item) => self.define(scope, Namespace::Value, &item.ident, Definition::Item(SymbolKind::Static)),
        Item::Fn(item) => self.define(scope, Namespace::Value, &item.sig.ident, Definition::Item(SymbolKind::Function)),
        Item::Macro(item) => {
          if let Some(ident) = &item.ident {
            self.define(scope, Namespace::Macro, ident, Definition::Item(SymbolKind::Macro));
          }
        }
        Item::Mod(item) => {
          let mut path = self.scope(scope).path.clone();
          path.push(name_of(&item.ident));
          let child = self.scope_for(&path);
          self.scopes[child.0].visibility.get_or_insert_with(|| item.vis.clone());
          if let Some((_, items)) = &item.content {
            self.collect_items(unit, child, items);
          }
        }
        Item::Use(item) => self.collect_use(scope, &item.tree, item.leading_colon.is_some(), Vec::new()),
        Item::ExternCrate(item) => self.collect_extern_crate(scope, item),
        Item::Impl(item) => self.impls.push(ImplRecord {
          scope,
          unit,
          self_ty: (*item.self_ty).clone(),
          methods: item
            .items
            .iter()
            .filter_map(|impl_item| match impl_item {
              ImplItem::Fn(method) => Some(method.sig.ident.clone()),
              _ => None,
            })
            .collect(),
        }),
        _ => {}
      }
    }
  }

  fn collect_use(&mut self, scope: ScopeId, tree: &UseTree, leading_colon: bool, mut prefix: Vec<String>) {
    match tree {
      UseTree::Path(path) => {
        prefix.push(name_of(&path.ident));
        self.collect_use(scope, &path.tree, leading_colon, prefix);
      }
      UseTree::Name(name) if name.ident == "self" => {
        if let Some(last) = prefix.last().cloned() {
          self.import(scope, last, UseTarget { leading_colon, segments: prefix });
        }
      }
      UseTree::Name(name) => {
        let local = name_of(&name.ident);
        prefix.push(local.clone());
        self.import(scope, local, UseTarget { leading_colon, segments: prefix });
      }
      UseTree::Rename(rename) => {
        if rename.ident != "self" {
          prefix.push(name_of(&rename.ident));
        }
        if rename.rename != "_" {
          self.import(scope, name_of(&rename.rename), UseTarget { leading_colon, segments: prefix });
        }
      }
      UseTree::Glob(_) => self.scopes[scope.0].globs.push(UseTarget { leading_colon, segments: prefix }),
      UseTree::Group(group) => {
        for tree in &group.items {
          self.collect_use(scope, tree, leading_colon, prefix.clone());
        }
      }
    }
  }

  fn collect_extern_crate(&mut self, scope: ScopeId, item: &syn::ItemExternCrate) {
    let local = item.rename.as_ref().map_or(&item.ident, |(_, rename)| rename);
    if local == "_" {
      return;
    }

    let target = if item.ident == "self" {
      UseTarget {
        leading_colon: false,
        segments: vec!["crate".to_owned()],
      }
    } else {
      UseTarget {
        leading_colon: true,
        segments: vec![name_of(&item.ident)],
      }
    };

    if scope == ScopeId::CRATE_ROOT {
      self.extern_aliases.insert(name_of(local), target.clone());
    }
    self.import(scope, name_of(local), target);
  }
}
